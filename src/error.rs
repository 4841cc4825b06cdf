use thiserror::Error;

#[derive(Error, Debug)]
pub enum DisasterMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GOOGLE_API_KEY を設定するか `disaster-match config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error(transparent)]
    Common(#[from] disaster_match_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

/// URL（クエリを含む）はメッセージに残さない
impl From<reqwest::Error> for DisasterMatchError {
    fn from(e: reqwest::Error) -> Self {
        DisasterMatchError::ApiCall(e.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, DisasterMatchError>;
