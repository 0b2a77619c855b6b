pub mod cache;
mod command;
mod sidecar;

pub use cache::CacheFile;
pub use command::CommandDetector;
pub use sidecar::SidecarDetector;

use crate::config::Config;
use crate::error::{Result, VerigrainError};
use std::path::Path;
use std::time::Duration;
use verigrain_common::Detection;

/// 検出バックエンド
#[derive(Debug, Clone)]
pub enum Detector {
    /// 外部検出器プロセス
    Command(CommandDetector),
    /// 事前計算済みJSON
    Sidecar(SidecarDetector),
}

impl Detector {
    /// 設定から検出器を構築
    ///
    /// `detections` を指定した場合、またはフォルダ内に検出結果JSONを置く運用では
    /// 検出器プロセスを起動しない。
    pub fn from_config(config: &Config, detections: Option<&Path>, sidecar: bool) -> Result<Self> {
        if detections.is_some() || sidecar {
            return Ok(Detector::Sidecar(SidecarDetector::new(
                detections.map(Path::to_path_buf),
            )));
        }

        let detector = CommandDetector::new(
            config.detector_command.clone(),
            config.detector_args.clone(),
            &config.model_path,
            config.confidence_threshold,
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Detector::Command(detector))
    }

    /// キャッシュ識別子（モデルパス + 検出器に渡す信頼度）。事前計算済みJSONはキャッシュしない
    pub fn cache_key(&self) -> Option<String> {
        match self {
            Detector::Command(d) => Some(format!("{}@conf={:.2}", d.model_path().display(), d.confidence())),
            Detector::Sidecar(_) => None,
        }
    }

    /// 明示指定の検出結果ファイルは画像1枚にしか使えない
    pub fn check_image_count(&self, count: usize) -> Result<()> {
        match self {
            Detector::Sidecar(d) if d.is_explicit() && count > 1 => Err(VerigrainError::Config(format!(
                "--detections は画像1枚の監査専用です（{}枚検出）。フォルダには --sidecar を使用してください",
                count
            ))),
            _ => Ok(()),
        }
    }

    pub async fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        match self {
            Detector::Command(d) => d.detect(image).await,
            Detector::Sidecar(d) => d.detect(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_config_missing_model() {
        let config = Config {
            model_path: PathBuf::from("/nonexistent/best.pt"),
            ..Default::default()
        };
        let result = Detector::from_config(&config, None, false);
        assert!(matches!(result, Err(VerigrainError::ModelUnavailable(_))));
    }

    #[test]
    fn test_from_config_detections_skip_model() {
        let config = Config {
            model_path: PathBuf::from("/nonexistent/best.pt"),
            ..Default::default()
        };
        let detector = Detector::from_config(&config, Some(Path::new("d.json")), false).unwrap();
        assert!(matches!(detector, Detector::Sidecar(_)));
        assert!(detector.cache_key().is_none());
    }

    #[test]
    fn test_explicit_detections_single_image_only() {
        let explicit = Detector::Sidecar(SidecarDetector::new(Some(PathBuf::from("d.json"))));
        assert!(explicit.check_image_count(1).is_ok());
        assert!(matches!(explicit.check_image_count(2), Err(VerigrainError::Config(_))));

        let beside = Detector::Sidecar(SidecarDetector::default());
        assert!(beside.check_image_count(5).is_ok());
    }

    #[test]
    fn test_cache_key_tracks_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("best.pt");
        std::fs::write(&model, b"weights").unwrap();

        let strict = Config {
            model_path: model.clone(),
            confidence_threshold: 0.7,
            ..Default::default()
        };
        let loose = Config {
            confidence_threshold: 0.5,
            ..strict.clone()
        };

        let strict_key = Detector::from_config(&strict, None, false).unwrap().cache_key().unwrap();
        let loose_key = Detector::from_config(&loose, None, false).unwrap().cache_key().unwrap();
        assert_ne!(strict_key, loose_key);
        assert!(loose_key.ends_with("@conf=0.50"));
    }
}
