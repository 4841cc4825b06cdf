//! Disaster Match Common Library
//!
//! Webサーバーと CLI で共有される判定・プロンプト・パース処理

pub mod types;
pub mod error;
pub mod classifier;
pub mod prompts;
pub mod parser;

pub use types::{ClassifiedBatch, DataCategory, FileDiagnostic, FileOutcome, Match, UploadedFile};
pub use error::{Error, Result};
pub use classifier::{classify_files, classify_headers, parse_csv_bytes, preview_file, PREVIEW_ROWS};
pub use prompts::build_match_prompt;
pub use parser::{clean_json_string, parse_json_response, parse_match_response, validate_matches};
