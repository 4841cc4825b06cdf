//! 照合処理の型定義
//!
//! - UploadedFile: アップロードされたファイル（1リクエスト限り）
//! - DataCategory: アップロードされたCSVの区分（防災システム / SNS）
//! - FileDiagnostic: ファイルごとの判定結果
//! - ClassifiedBatch: 区分ごとのプレビューテキストと判定結果一覧
//! - Match: AIが出力した照合結果1件

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// アップロードされたファイル
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// CSVファイルの区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataCategory {
    /// A: 防災システム（時系列の公式記録）
    Chronological,
    /// B: SNS投稿
    Social,
}

impl DataCategory {
    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            DataCategory::Chronological => "防災システム",
            DataCategory::Social => "SNS",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// ファイル1件の判定結果
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FileOutcome {
    /// プレビューに採用された
    #[serde(rename_all = "camelCase")]
    Accepted {
        category: DataCategory,
        rows: usize,
        skipped_lines: usize,
    },
    /// 列名がどちらの区分にも該当しない
    Unrecognized,
    /// 読み込み・抽出に失敗
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiagnostic {
    pub file_name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileDiagnostic {
    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, FileOutcome::Accepted { .. })
    }

    /// 画面・ログ表示用の説明文
    pub fn describe(&self) -> String {
        match &self.outcome {
            FileOutcome::Accepted { category, rows, skipped_lines } if *skipped_lines > 0 => {
                format!("{}として採用（{}行、不正行{}行をスキップ）", category, rows, skipped_lines)
            }
            FileOutcome::Accepted { category, rows, .. } => {
                format!("{}として採用（{}行）", category, rows)
            }
            FileOutcome::Unrecognized => "列名が判別できないため除外".to_string(),
            FileOutcome::Failed { reason } => format!("読み込み失敗のため除外: {}", reason),
        }
    }
}

/// 1リクエスト分の分類結果
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBatch {
    /// A: 防災システムのプレビュー（ファイルごとに改行区切り）
    pub chrono_text: String,
    /// B: SNSのプレビュー
    pub sns_text: String,
    pub diagnostics: Vec<FileDiagnostic>,
}

impl ClassifiedBatch {
    /// 両区分のデータが揃っているか
    pub fn is_complete(&self) -> bool {
        !self.chrono_text.is_empty() && !self.sns_text.is_empty()
    }

    pub(crate) fn append(&mut self, category: DataCategory, csv_text: &str) {
        let target = match category {
            DataCategory::Chronological => &mut self.chrono_text,
            DataCategory::Social => &mut self.sns_text,
        };
        target.push('\n');
        target.push_str(csv_text);
    }
}

/// 照合結果1件（AIが出力したフィールドを出力順に保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Match {
    fields: Vec<(String, String)>,
}

impl Match {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Match {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
