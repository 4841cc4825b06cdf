//! HTMLレンダリング
//!
//! - render_index: アップロードフォーム + 照合結果 + ファイル判定結果
//! - render_model_list / render_model_list_error: モデル一覧（診断ページ）

use crate::analyzer::{MatchOutcome, PageError};
use disaster_match_common::{FileDiagnostic, Match};

pub const MODEL_LIST_PATH: &str = "/debug_models";

const STYLES: &str = r#"
body { font-family: 'Hiragino Sans', 'Noto Sans JP', sans-serif; margin: 0; background: #f5f6f8; color: #222; }
main { max-width: 960px; margin: 0 auto; padding: 24px; }
h1 { font-size: 22px; }
form { background: #fff; padding: 16px; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.error { background: #fdecea; color: #b71c1c; padding: 12px; border-radius: 6px; margin: 16px 0; }
.diagnostics li.accepted { color: #1b5e20; }
.diagnostics li.rejected { color: #8a6d00; }
.match { background: #fff; border-left: 4px solid #1976d2; padding: 12px 16px; margin: 12px 0; border-radius: 4px; }
.match dt { font-weight: bold; font-size: 13px; color: #555; }
.match dd { margin: 0 0 8px 0; white-space: pre-wrap; }
"#;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_error(error: &PageError) -> String {
    let mut html = format!("<div class=\"error\">{}", escape_html(&error.to_string()));
    if error.links_model_list() {
        html.push_str(&format!(
            " <br><a href='{}' target='_blank'>使えるモデル一覧を確認する</a>",
            MODEL_LIST_PATH
        ));
    }
    html.push_str("</div>");
    html
}

fn render_diagnostics(diagnostics: &[FileDiagnostic]) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }

    let items: String = diagnostics
        .iter()
        .map(|d| {
            format!(
                "<li class=\"{}\">{}: {}</li>",
                if d.is_accepted() { "accepted" } else { "rejected" },
                escape_html(&d.file_name),
                escape_html(&d.describe())
            )
        })
        .collect();
    format!("<section class=\"diagnostics\"><h2>ファイル判定結果</h2><ul>{}</ul></section>", items)
}

fn render_match(m: &Match) -> String {
    let fields: String = m
        .fields()
        .map(|(k, v)| format!("<dt>{}</dt><dd>{}</dd>", escape_html(k), escape_html(v)))
        .collect();
    format!("<article class=\"match\"><dl>{}</dl></article>", fields)
}

fn render_matches(outcome: &MatchOutcome) -> String {
    if outcome.matches.is_empty() {
        return String::new();
    }
    let cards: String = outcome.matches.iter().map(render_match).collect();
    format!(
        "<section class=\"matches\"><h2>照合結果（{}件）</h2>{}</section>",
        outcome.matches.len(),
        cards
    )
}

/// トップページ
pub fn render_index(outcome: &MatchOutcome) -> String {
    let error = outcome.error.as_ref().map(render_error).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>災害情報照合</title>
<style>{styles}</style>
</head>
<body>
<main>
<h1>防災システム × SNS 災害情報照合</h1>
<form method="post" action="/" enctype="multipart/form-data">
<p>防災システムのCSV（受信日時・情報内容・住所）とSNSのCSV（日時・テキスト・市区町村）を選択してください。</p>
<input type="file" name="files" accept=".csv,text/csv" multiple>
<button type="submit">照合する</button>
</form>
{error}
{diagnostics}
{matches}
</main>
</body>
</html>
"#,
        styles = STYLES,
        error = error,
        diagnostics = render_diagnostics(&outcome.diagnostics),
        matches = render_matches(outcome),
    )
}

/// モデル一覧ページ
pub fn render_model_list(models: &[String]) -> String {
    let items: String = models
        .iter()
        .map(|m| format!("<li>{}</li>", escape_html(m)))
        .collect();
    format!("<h3>現在使用可能なモデル一覧 (APIから取得):</h3><ul>{}</ul>", items)
}

/// モデル一覧取得エラー
pub fn render_model_list_error(detail: &str) -> String {
    format!("エラー: {}", escape_html(detail))
}
