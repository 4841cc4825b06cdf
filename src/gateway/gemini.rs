//! Gemini REST API 実装
//!
//! - generateContent: `POST {base}/v1beta/models/{model}:generateContent`
//! - models.list: `GET {base}/v1beta/models`（nextPageToken がなくなるまで取得）
//!
//! APIキーは URL ではなく `x-goog-api-key` ヘッダーで送る。

use super::{ModelGateway, ModelInfo};
use crate::config::Config;
use crate::error::{DisasterMatchError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const LIST_PAGE_SIZE: u32 = 1000;

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

/// APIエラー本文（{"error": {"code", "message", "status"}}）
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DisasterMatchError::Config(format!("HTTPクライアントの初期化に失敗: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(DisasterMatchError::MissingApiKey)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}/{}:generateContent",
            self.base_url,
            API_VERSION,
            model_resource_name(&self.model)
        )
    }
}

/// モデルIDをリソース名にする（`gemini-1.5-flash` → `models/gemini-1.5-flash`）
pub(crate) fn model_resource_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// 非2xx応答をエラーにする
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
        Ok(parsed) if !parsed.error.status.is_empty() => {
            format!("{} {}", parsed.error.status, parsed.error.message)
        }
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    };
    Err(DisasterMatchError::ApiCall(format!("HTTP {}: {}", status.as_u16(), detail.trim())))
}

/// 先頭候補のテキストパートを連結する
fn response_text(response: GeminiResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(DisasterMatchError::ApiParse(format!("プロンプトがブロックされました: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| DisasterMatchError::ApiParse("応答に候補が含まれていません".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".into());
        return Err(DisasterMatchError::ApiParse(format!(
            "応答にテキストが含まれていません（finishReason: {}）",
            reason
        )));
    }
    Ok(text)
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "generateContent");
        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;
        let response: GeminiResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DisasterMatchError::ApiParse(e.without_url().to_string()))?;

        let text = response_text(response)?;
        tracing::debug!(response_chars = text.chars().count(), "generateContent done");
        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let api_key = self.api_key()?;
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let url = format!("{}/{}/models", self.base_url, API_VERSION);

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, api_key)
                .query(&[("pageSize", LIST_PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let page: ListModelsResponse = check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| DisasterMatchError::ApiParse(e.without_url().to_string()))?;

            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(count = models.len(), "models.list");
        Ok(models)
    }
}
