//! 設定ファイルの読み書きテスト

use garment_recolor::config::Config;
use garment_recolor::error::AppError;
use tempfile::tempdir;

#[test]
fn test_load_missing_file_returns_default() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config = Config::load_from(&dir.path().join("config.json")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.detect_model, "gemini-3-flash-preview");
    assert_eq!(config.recolor_model, "gemini-2.5-flash-image");
    assert!(config.timeout_seconds.is_none());
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    // 親ディレクトリが無くても作成される
    let path = dir.path().join("nested").join("config.json");

    let config = Config {
        api_key: Some("test-key".into()),
        timeout_seconds: Some(30),
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "recolor_model": "custom-image-model" }"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.recolor_model, "custom-image-model");
    assert_eq!(loaded.detect_model, "gemini-3-flash-preview");
    assert!(loaded.api_key.is_none());
}

#[test]
fn test_invalid_json_is_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, AppError::JsonParse(_)));
}
