//! APIレスポンスパーサー
//!
//! AIの応答からMarkdownのコードフェンスを取り除き、JSONとしてパースする。
//! 照合結果は「フラットなオブジェクトの配列」であることを検証してから返す。

use crate::error::{Error, Result};
use crate::types::Match;
use regex::Regex;
use serde_json::Value;

lazy_static::lazy_static! {
    /// 先頭の ```json
    static ref JSON_FENCE_START: Regex = Regex::new(r"^\s*```json\s*").unwrap();
    /// 先頭の ```
    static ref FENCE_START: Regex = Regex::new(r"^\s*```\s*").unwrap();
    /// 末尾の ```
    static ref FENCE_END: Regex = Regex::new(r"\s*```\s*$").unwrap();
}

/// 応答文字列からコードフェンスを除去して前後の空白を削る
///
/// フェンスがない場合は trim のみ。
///
/// # Examples
/// ```
/// use disaster_match_common::clean_json_string;
///
/// let cleaned = clean_json_string("```json\n[{\"a\": \"1\"}]\n```");
/// assert_eq!(cleaned, "[{\"a\": \"1\"}]");
/// ```
pub fn clean_json_string(response: &str) -> String {
    let cleaned = JSON_FENCE_START.replace(response, "");
    let cleaned = FENCE_START.replace(&cleaned, "");
    let cleaned = FENCE_END.replace(&cleaned, "");
    cleaned.trim().to_string()
}

/// 応答をJSONとしてパース（スキーマ検証なし）
pub fn parse_json_response(response: &str) -> Result<Value> {
    let cleaned = clean_json_string(response);
    Ok(serde_json::from_str(&cleaned)?)
}

/// パース済みJSONを照合結果の配列として検証する
///
/// 値は文字列を基本とし、数値・真偽値は文字列化、null は空文字にする。
/// 配列・オブジェクトがネストしている場合はエラー。
pub fn validate_matches(value: Value) -> Result<Vec<Match>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::Schema(format!(
                "JSON配列ではありません（{}）",
                json_type_name(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let Value::Object(map) = item else {
                return Err(Error::Schema(format!(
                    "{}件目がオブジェクトではありません（{}）",
                    idx + 1,
                    json_type_name(&item)
                )));
            };

            let mut m = Match::new();
            for (key, value) in map {
                let text = match value {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(Error::Schema(format!(
                            "{}件目の \"{}\" が文字列ではありません",
                            idx + 1,
                            key
                        )))
                    }
                };
                m.insert(key, text);
            }
            Ok(m)
        })
        .collect()
}

/// 照合レスポンスをパース
///
/// # Arguments
/// * `response` - AIの応答テキスト
///
/// # Returns
/// * `Ok(Vec<Match>)` - パース・検証成功
/// * `Err` - JSONでない、またはスキーマ不一致
pub fn parse_match_response(response: &str) -> Result<Vec<Match>> {
    validate_matches(parse_json_response(response)?)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // clean_json_string テスト
    // =============================================

    #[test]
    fn test_clean_json_fence() {
        let response = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(clean_json_string(response), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_clean_plain_fence() {
        let response = "```\n[1, 2]\n```";
        assert_eq!(clean_json_string(response), "[1, 2]");
    }

    #[test]
    fn test_clean_trailing_newline_after_fence() {
        let response = "```json\n[]\n```\n";
        assert_eq!(clean_json_string(response), "[]");
    }

    #[test]
    fn test_clean_without_fence_is_trim() {
        let response = "  \n[{\"a\": \"1\"}]\n  ";
        assert_eq!(clean_json_string(response), "[{\"a\": \"1\"}]");
    }

    #[test]
    fn test_clean_keeps_inner_backticks() {
        let response = "```json\n[{\"a\": \"```\"}]\n```";
        assert_eq!(clean_json_string(response), "[{\"a\": \"```\"}]");
    }

    // =============================================
    // parse_json_response テスト
    // =============================================

    #[test]
    fn test_parse_json_response_object() {
        let value = parse_json_response("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_parse_json_response_invalid() {
        let result = parse_json_response("申し訳ありませんが照合できませんでした。");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    // =============================================
    // parse_match_response テスト
    // =============================================

    #[test]
    fn test_parse_match_response() {
        let response = r#"```json
[
  {"system_time": "2024-07-01 10:00", "sns_time": "2024-07-01 10:05", "confidence": "高"}
]
```"#;

        let matches = parse_match_response(response).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].get("system_time"), Some("2024-07-01 10:00"));
        assert_eq!(matches[0].get("confidence"), Some("高"));
    }

    #[test]
    fn test_parse_match_response_keeps_field_order() {
        let matches = parse_match_response(r#"[{"z": "1", "a": "2", "m": "3"}]"#).unwrap();
        let keys: Vec<&str> = matches[0].fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_match_response_scalars_to_string() {
        let matches = parse_match_response(r#"[{"n": 3, "b": true, "x": null}]"#).unwrap();
        assert_eq!(matches[0].get("n"), Some("3"));
        assert_eq!(matches[0].get("b"), Some("true"));
        assert_eq!(matches[0].get("x"), Some(""));
    }

    #[test]
    fn test_parse_match_response_empty_array() {
        let matches = parse_match_response("```json\n[]\n```").unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_parse_match_response_not_array() {
        let result = parse_match_response(r#"{"matches": []}"#);
        match result {
            Err(Error::Schema(msg)) => assert!(msg.contains("object")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_match_response_item_not_object() {
        let result = parse_match_response(r#"[{"a": "1"}, "text"]"#);
        match result {
            Err(Error::Schema(msg)) => assert!(msg.contains("2件目")),
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_match_response_nested_value() {
        let result = parse_match_response(r#"[{"a": ["x", "y"]}]"#);
        assert!(matches!(result, Err(Error::Schema(_))));
    }
}
