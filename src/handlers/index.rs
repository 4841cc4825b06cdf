use super::{AppError, AppState};
use crate::analyzer::{self, MatchOutcome};
use crate::view;
use axum::{
    extract::{Multipart, State},
    response::Html,
};
use disaster_match_common::UploadedFile;

/// フォームのファイル欄
const FILES_FIELD: &str = "files";

/// GET /
pub async fn index_page() -> Html<String> {
    Html(view::render_index(&MatchOutcome::default()))
}

/// POST /
///
/// `files` 欄のファイルをすべて受け取り照合する。その他の欄は無視する。
pub async fn submit_files(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let files = read_uploads(multipart).await?;
    tracing::info!(count = files.len(), "CSVアップロード受信");

    let outcome = analyzer::run_matching(&state.config, state.gateway.as_ref(), &files).await;
    Ok(Html(view::render_index(&outcome)))
}

async fn read_uploads(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        files.push(UploadedFile::new(file_name, bytes.to_vec()));
    }

    Ok(files)
}
