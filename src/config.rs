use crate::error::{DisasterMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// 起動時に一度だけ組み立て、以後は読み取り専用で共有する設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
    /// Gemini呼び出しのタイムアウト（未設定ならHTTPクライアントの既定）
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout_seconds: None,
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順に読み込む
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Ok(path) => Self::load_file(&path)?,
            Err(_) => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// 設定ファイルを読み込む（存在しなければ既定値）
    pub fn load_file(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DisasterMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("disaster-match").join("config.json"))
    }

    /// 環境変数で上書きする
    ///
    /// `lookup` は環境変数の参照関数（テストで差し替える）。空文字の値は未設定扱い。
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("GOOGLE_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(url) = get("GEMINI_API_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(port) = get("PORT") {
            self.bind_addr = format!("0.0.0.0:{}", port.trim());
        }
        if let Some(addr) = get("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(size) = get("MAX_UPLOAD_BYTES").and_then(|v| parse_env_number("MAX_UPLOAD_BYTES", &v)) {
            self.max_upload_bytes = size;
        }
        if let Some(secs) = get("GEMINI_TIMEOUT_SECONDS").and_then(|v| parse_env_number("GEMINI_TIMEOUT_SECONDS", &v)) {
            self.timeout_seconds = Some(secs);
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(DisasterMatchError::MissingApiKey)
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

/// 数値の環境変数を読む。解釈できない値は警告して無視する
fn parse_env_number<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("環境変数 {} の値を数値として解釈できないため無視します: {:?}", key, value);
            None
        }
    }
}
