//! CSVファイルの判定とプレビュー抽出
//!
//! アップロードされたCSVを列名で判定し、区分ごとに先頭50行のプレビューを作る:
//! - `受信日時` と `情報内容` を持つ → A: 防災システム
//! - `テキスト` か `SNS_URL` を持つ → B: SNS
//!
//! 文字コードは UTF-8（BOM付き可）を先に試し、失敗したら Shift_JIS で読み直す。
//! 判定・抽出に失敗したファイルは `FileDiagnostic` に記録され、プレビューには含まれない。

use crate::error::{Error, Result};
use crate::types::{ClassifiedBatch, DataCategory, FileDiagnostic, FileOutcome, UploadedFile};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

/// プレビューに含める最大行数
pub const PREVIEW_ROWS: usize = 50;

/// A: 防災システムから抽出する列
pub const CHRONO_COLUMNS: [&str; 3] = ["受信日時", "情報内容", "住所"];

/// B: SNSから抽出する列
pub const SNS_COLUMNS: [&str; 3] = ["日時", "テキスト", "市区町村"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 読み込んだCSV（ヘッダー + データ行）
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 列数がヘッダーより多いためスキップした行数
    pub skipped_lines: usize,
}

impl CsvTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 指定列の先頭 `max_rows` 行をCSV文字列にする（インデックス列なし）
    pub fn preview_csv(&self, columns: &[&str], max_rows: usize) -> Result<String> {
        let mut indices = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for column in columns {
            match self.column_index(column) {
                Some(idx) => indices.push(idx),
                None => missing.push(column.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(columns)?;
        for row in self.rows.iter().take(max_rows) {
            writer.write_record(indices.iter().map(|&i| row[i].as_str()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}

/// 採用されたファイルのプレビュー
#[derive(Debug, Clone)]
pub struct FilePreview {
    pub category: DataCategory,
    pub csv_text: String,
    pub rows: usize,
    pub skipped_lines: usize,
}

/// 列名から区分を判定する（A を優先）
pub fn classify_headers(headers: &[String]) -> Option<DataCategory> {
    let has = |name: &str| headers.iter().any(|h| h == name);

    if has("受信日時") && has("情報内容") {
        Some(DataCategory::Chronological)
    } else if has("テキスト") || has("SNS_URL") {
        Some(DataCategory::Social)
    } else {
        None
    }
}

/// 区分ごとの抽出列
pub fn preview_columns(category: DataCategory) -> &'static [&'static str] {
    match category {
        DataCategory::Chronological => &CHRONO_COLUMNS,
        DataCategory::Social => &SNS_COLUMNS,
    }
}

/// BOMを除いたうえで指定の文字コードとして厳密にデコード
fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(|text| text.into_owned())
}

/// 文字列をCSVとして読み込む
///
/// 列数がヘッダーより多い行はスキップし、少ない行は空文字で埋める。
pub fn read_table(text: &str) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Parse("ヘッダー行がありません".into()));
    }

    let mut table = CsvTable {
        headers,
        ..Default::default()
    };

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(_) => {
                table.skipped_lines += 1;
                continue;
            }
        };
        if record.len() > table.headers.len() {
            table.skipped_lines += 1;
            continue;
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(table.headers.len(), String::new());
        table.rows.push(row);
    }

    Ok(table)
}

/// バイト列をCSVとして読み込む（UTF-8 → Shift_JIS の順に試す）
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<CsvTable> {
    let utf8 = decode_strict(bytes, UTF_8)
        .ok_or_else(|| Error::Decode("UTF-8として読み込めません".into()))
        .and_then(|text| read_table(&text));

    match utf8 {
        Ok(table) => Ok(table),
        Err(_) => {
            let text = decode_strict(bytes, SHIFT_JIS)
                .ok_or_else(|| Error::Decode("UTF-8/Shift_JISとして読み込めません".into()))?;
            read_table(&text)
        }
    }
}

/// 1ファイルを判定してプレビューを作る
///
/// どちらの区分にも該当しない場合は `Ok(None)`。
pub fn preview_file(bytes: &[u8]) -> Result<Option<FilePreview>> {
    let table = parse_csv_bytes(bytes)?;
    let Some(category) = classify_headers(&table.headers) else {
        return Ok(None);
    };

    let csv_text = table.preview_csv(preview_columns(category), PREVIEW_ROWS)?;
    Ok(Some(FilePreview {
        category,
        csv_text,
        rows: table.rows.len().min(PREVIEW_ROWS),
        skipped_lines: table.skipped_lines,
    }))
}

/// アップロードされたファイル群を判定し、区分ごとのプレビューを集める
///
/// ファイル名が空のものは無視する。個々のファイルの失敗は
/// `diagnostics` に記録され、呼び出し元へエラーとしては返らない。
pub fn classify_files(files: &[UploadedFile]) -> ClassifiedBatch {
    let mut batch = ClassifiedBatch::default();

    for file in files {
        if file.file_name.is_empty() {
            continue;
        }

        let outcome = match preview_file(&file.bytes) {
            Ok(Some(preview)) => {
                batch.append(preview.category, &preview.csv_text);
                FileOutcome::Accepted {
                    category: preview.category,
                    rows: preview.rows,
                    skipped_lines: preview.skipped_lines,
                }
            }
            Ok(None) => FileOutcome::Unrecognized,
            Err(e) => FileOutcome::Failed { reason: e.to_string() },
        };

        batch.diagnostics.push(FileDiagnostic {
            file_name: file.file_name.clone(),
            outcome,
        });
    }

    batch
}
