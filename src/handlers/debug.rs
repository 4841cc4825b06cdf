use super::AppState;
use crate::gateway;
use crate::view;
use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

/// GET /debug_models
///
/// コンテンツ生成に対応したモデルの一覧を表示する
pub async fn debug_models(State(state): State<AppState>) -> Response {
    if !state.config.has_api_key() {
        return "APIキーが設定されていません".into_response();
    }

    match gateway::list_generate_content_models(state.gateway.as_ref()).await {
        Ok(models) => Html(view::render_model_list(&models)).into_response(),
        Err(e) => {
            tracing::error!("モデル一覧の取得に失敗: {}", e);
            Html(view::render_model_list_error(&e.to_string())).into_response()
        }
    }
}
