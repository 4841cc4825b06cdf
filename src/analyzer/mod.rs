mod types;

pub use types::{MatchOutcome, PageError};

use crate::config::Config;
use crate::error::Result;
use crate::gateway::ModelGateway;
use disaster_match_common::{
    build_match_prompt, classify_files, parse_match_response, ClassifiedBatch, Match, UploadedFile,
};

pub const MISSING_API_KEY_MESSAGE: &str = "サーバー設定エラー: APIキーが設定されていません。";
pub const NO_FILES_MESSAGE: &str = "CSVファイルを選択してください。";
pub const NEED_BOTH_MESSAGE: &str = "エラー: SNSデータと防災システムデータの両方が必要です。";

/// アップロードされたCSVを照合する
///
/// 1. APIキー・入力ファイルの確認
/// 2. ファイル判定とプレビュー抽出
/// 3. プロンプト生成 → モデル呼び出し → 応答パース
///
/// どの段階の失敗も `MatchOutcome::error` に入り、エラーとしては返らない。
pub async fn run_matching(
    config: &Config,
    gateway: &dyn ModelGateway,
    files: &[UploadedFile],
) -> MatchOutcome {
    if !config.has_api_key() {
        tracing::warn!("APIキー未設定のためリクエストを処理できません");
        return MatchOutcome::with_error(PageError::Message(MISSING_API_KEY_MESSAGE.into()), Vec::new());
    }

    if files.first().map_or(true, |f| f.file_name.is_empty()) {
        return MatchOutcome::with_error(PageError::Message(NO_FILES_MESSAGE.into()), Vec::new());
    }

    let batch = classify_files(files);
    for diag in &batch.diagnostics {
        if diag.is_accepted() {
            tracing::info!(file = %diag.file_name, "{}", diag.describe());
        } else {
            tracing::warn!(file = %diag.file_name, "{}", diag.describe());
        }
    }

    if !batch.is_complete() {
        return MatchOutcome::with_error(PageError::Message(NEED_BOTH_MESSAGE.into()), batch.diagnostics);
    }

    match match_batch(gateway, &batch).await {
        Ok(matches) => {
            tracing::info!(count = matches.len(), "照合完了");
            MatchOutcome {
                matches,
                error: None,
                diagnostics: batch.diagnostics,
            }
        }
        Err(e) => {
            tracing::error!(model = %config.model, "照合エラー: {}", e);
            MatchOutcome::with_error(
                PageError::Model {
                    model: config.model.clone(),
                    detail: e.to_string(),
                },
                batch.diagnostics,
            )
        }
    }
}

/// 両区分が揃ったバッチをモデルに照合させる
pub async fn match_batch(gateway: &dyn ModelGateway, batch: &ClassifiedBatch) -> Result<Vec<Match>> {
    let prompt = build_match_prompt(&batch.chrono_text, &batch.sns_text);
    tracing::debug!(prompt_chars = prompt.chars().count(), "プロンプト生成");

    let response = gateway.generate_content(&prompt).await?;
    Ok(parse_match_response(&response)?)
}
