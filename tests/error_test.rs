//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use disaster_match::error::DisasterMatchError;

/// DisasterMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DisasterMatchError::Config("テスト設定エラー".to_string()),
        DisasterMatchError::FileNotFound("chrono.csv".to_string()),
        DisasterMatchError::ApiCall("API呼び出し失敗".to_string()),
        DisasterMatchError::ApiParse("候補なし".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let err = DisasterMatchError::MissingApiKey;
    let display = format!("{}", err);

    assert!(display.contains("APIキー"));
    assert!(display.contains("GOOGLE_API_KEY"));
    assert!(display.contains("disaster-match config"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = DisasterMatchError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DisasterMatchError = io_err.into();

    assert!(matches!(err, DisasterMatchError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: DisasterMatchError = json_err.into();

    assert!(matches!(err, DisasterMatchError::JsonParse(_)));
}

/// common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = disaster_match_common::Error::Parse("パースエラー".to_string());
    let err: DisasterMatchError = common_err.into();

    assert!(matches!(err, DisasterMatchError::Common(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = disaster_match_common::Error::Schema("JSON配列ではありません（object）".to_string());
    let err: DisasterMatchError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    assert_eq!(format!("{}", err), "Schema error: JSON配列ではありません（object）");
}
