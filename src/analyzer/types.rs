use disaster_match_common::{FileDiagnostic, Match};
use std::fmt;

/// 画面に表示するエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// 入力・設定の問題（固定文言）
    Message(String),
    /// モデル呼び出しまたは応答パースの失敗
    Model { model: String, detail: String },
}

impl PageError {
    /// モデル一覧ページへのリンクを添えるか
    pub fn links_model_list(&self) -> bool {
        matches!(self, PageError::Model { .. })
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::Message(msg) => f.write_str(msg),
            PageError::Model { model, detail } => {
                write!(f, "モデル '{}' でエラーが発生: {}.", model, detail)
            }
        }
    }
}

/// 1リクエストの処理結果
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub matches: Vec<Match>,
    pub error: Option<PageError>,
    pub diagnostics: Vec<FileDiagnostic>,
}

impl MatchOutcome {
    pub(crate) fn with_error(error: PageError, diagnostics: Vec<FileDiagnostic>) -> Self {
        Self {
            matches: Vec::new(),
            error: Some(error),
            diagnostics,
        }
    }
}
