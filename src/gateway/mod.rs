//! 生成AI（モデルゲートウェイ）連携
//!
//! - ModelGateway: テキスト生成とモデル一覧取得の抽象
//! - GeminiGateway: Gemini REST API 実装

mod gemini;

pub use gemini::GeminiGateway;

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// コンテンツ生成に対応していることを示すメソッド名
pub const GENERATE_CONTENT: &str = "generateContent";

/// モデル一覧の1件
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// プロンプトを送り、生成されたテキストを返す
    async fn generate_content(&self, prompt: &str) -> Result<String>;

    /// 利用可能なモデル一覧
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

/// コンテンツ生成に対応したモデル名だけを返す
pub async fn list_generate_content_models(gateway: &dyn ModelGateway) -> Result<Vec<String>> {
    let models = gateway.list_models().await?;
    Ok(models
        .into_iter()
        .filter(ModelInfo::supports_generate_content)
        .map(|m| m.name)
        .collect())
}
