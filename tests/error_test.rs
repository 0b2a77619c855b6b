//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use tempfile::tempdir;
use verigrain::config::Config;
use verigrain::detector::{Detector, SidecarDetector};
use verigrain::error::VerigrainError;
use verigrain::scanner;
use verigrain_common::VarietyTable;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(matches!(result, Err(VerigrainError::FolderNotFound(_))));
}

/// 画像のないフォルダは空のVecを返す
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("lot.json"), "[]").unwrap();

    let images = scanner::scan_folder(dir.path(), false).unwrap();
    assert!(images.is_empty());
}

/// 画像以外のファイルを直接指定した場合
#[test]
fn test_scan_unsupported_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("grains.bmp");
    std::fs::write(&path, b"BM").unwrap();

    let result = scanner::scan_path(&path, false);
    assert!(matches!(result, Err(VerigrainError::ImageLoad(_))));
}

/// モデルファイルが無い場合は型付きエラー
#[test]
fn test_model_unavailable() {
    let config = Config {
        model_path: "/nonexistent/weights/best.pt".into(),
        ..Default::default()
    };

    let err = Detector::from_config(&config, None, false).unwrap_err();
    assert!(matches!(err, VerigrainError::ModelUnavailable(_)));
    assert!(err.to_string().contains("--set-model"));
}

/// 検出結果JSONが壊れている場合
#[tokio::test]
async fn test_malformed_detections() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = dir.path().join("lot.jpg");
    std::fs::write(dir.path().join("lot.json"), "detector crashed").unwrap();

    let detector = Detector::Sidecar(SidecarDetector::default());
    let err = detector.detect(&image).await.unwrap_err();
    assert!(matches!(err, VerigrainError::Common(_)));
}

/// 未知の品種名
#[test]
fn test_unknown_variety() {
    let result = VarietyTable::presets().lookup("Arborio");
    assert!(matches!(
        result,
        Err(verigrain_common::Error::UnknownVariety(_))
    ));
}

/// 不正な設定値
#[test]
fn test_invalid_config() {
    let config = Config {
        confidence_threshold: 1.5,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(VerigrainError::Config(_))));
}
