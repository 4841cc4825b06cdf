//! HTTPハンドラ
//!
//! - `GET /`: アップロードフォーム
//! - `POST /`: CSVを受け取り照合結果を表示
//! - `GET /debug_models`: 利用可能なモデル一覧

mod debug;
mod error;
mod index;

pub use error::AppError;

use crate::config::Config;
use crate::gateway::ModelGateway;
use crate::view::MODEL_LIST_PATH;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn ModelGateway>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index::index_page).post(index::submit_files))
        .route(MODEL_LIST_PATH, get(debug::debug_models))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
