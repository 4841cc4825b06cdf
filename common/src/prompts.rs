//! プロンプト生成モジュール
//!
//! - MATCH_FIELDS: 照合結果として出力させるフィールド
//! - build_match_prompt: A（防災システム）とB（SNS）の照合用プロンプト

/// 照合結果1件のフィールド（出力形式の説明に使う）
pub const MATCH_FIELDS: &[(&str, &str)] = &[
    ("system_time", "Aの受信日時"),
    ("system_content", "Aの情報内容（要約可）"),
    ("sns_time", "Bの日時"),
    ("sns_text", "Bのテキスト（要約可）"),
    ("location", "一致した場所（住所・市区町村）"),
    ("confidence", "一致の確度（高/中/低）"),
    ("reason", "同一事象と判断した根拠"),
];

/// 照合プロンプト生成
///
/// CSVテキストはエスケープせずそのまま埋め込む。
///
/// # Arguments
/// * `chrono_text` - A: 防災システムのCSVプレビュー
/// * `sns_text` - B: SNSのCSVプレビュー
///
/// # Returns
/// 照合用のプロンプト文字列
pub fn build_match_prompt(chrono_text: &str, sns_text: &str) -> String {
    let field_list = MATCH_FIELDS
        .iter()
        .map(|(key, desc)| format!("    \"{}\": \"{}\"", key, desc))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"あなたは熟練した災害情報分析官です。
以下のA(防災システム)とB(SNS)を照合し、同一事象を特定してJSONで出力してください。

## 照合の手順
- Aの各記録について、日時・場所・内容が近いBの投稿を探す
- 日時は前後数時間のずれを許容し、場所は住所と市区町村の一致を重視する
- 内容が同じ現象（冠水、土砂崩れ、停電、倒木など）を指しているものだけを一致とする
- 確証のないものは出力しない

## 出力形式（厳密にこのJSON配列形式で出力）
[
  {{
{field_list}
  }}
]

## 注意
- 値はすべて文字列
- 一致が1件もなければ空配列 [] を出力
- JSON配列のみ出力。説明文は不要

[A: 防災システム] {chrono_text}
[B: SNSデータ] {sns_text}
"#
    )
}
