//! 結合テスト用の共通部品

#![allow(dead_code)]

use async_trait::async_trait;
use disaster_match::config::Config;
use disaster_match::error::{DisasterMatchError, Result};
use disaster_match::gateway::{ModelGateway, ModelInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_MODEL: &str = "gemini-test-model";

pub const CHRONO_CSV: &str = "受信日時,情報内容,住所\n\
2024-07-01 10:00,道路冠水,仙台市青葉区一番町\n\
2024-07-01 10:30,倒木,仙台市太白区長町\n\
2024-07-01 11:00,停電,仙台市宮城野区榴岡\n";

pub const SNS_CSV: &str = "日時,テキスト,市区町村\n\
2024-07-01 10:05,一番町の道が川みたいになってる,仙台市青葉区\n\
2024-07-01 10:40,長町で木が倒れて通れない,仙台市太白区\n\
2024-07-01 11:10,榴岡あたり停電してる,仙台市宮城野区\n";

/// 応答を差し替えられるゲートウェイ
pub struct StubGateway {
    reply: std::result::Result<String, String>,
    models: std::result::Result<Vec<ModelInfo>, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl StubGateway {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            models: Ok(Vec::new()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            models: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = Ok(models);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for StubGateway {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.reply.clone().map_err(DisasterMatchError::ApiCall)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.models.clone().map_err(DisasterMatchError::ApiCall)
    }
}

pub fn model(name: &str, methods: &[&str]) -> ModelInfo {
    ModelInfo {
        name: name.to_string(),
        supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn test_config() -> Config {
    Config {
        api_key: Some("test-key".into()),
        model: TEST_MODEL.into(),
        ..Config::default()
    }
}
