//! 事前計算済み検出結果の読み込み
//!
//! 画像と同じフォルダの `<stem>.json`、または明示指定したJSONファイルを使う。

use crate::error::{Result, VerigrainError};
use std::path::{Path, PathBuf};
use verigrain_common::{parse_detections, Detection};

#[derive(Debug, Clone, Default)]
pub struct SidecarDetector {
    explicit: Option<PathBuf>,
}

impl SidecarDetector {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// 検出結果ファイルを明示指定しているか（単一画像専用）
    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }

    /// 画像に対応する検出結果ファイル
    pub fn sidecar_path(&self, image: &Path) -> PathBuf {
        match &self.explicit {
            Some(path) => path.clone(),
            None => image.with_extension("json"),
        }
    }

    pub fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        let path = self.sidecar_path(image);
        if !path.exists() {
            return Err(VerigrainError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(&path)?;
        Ok(parse_detections(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_next_to_image() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("lot7.jpg");
        std::fs::write(dir.path().join("lot7.json"), r#"[{"label": "low", "confidence": 0.8}]"#).unwrap();

        let detector = SidecarDetector::default();
        assert_eq!(detector.sidecar_path(&image), dir.path().join("lot7.json"));

        let detections = detector.detect(&image).unwrap();
        assert_eq!(detections, vec![Detection::new("low", 0.8)]);
    }

    #[test]
    fn test_explicit_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("detections.json");
        std::fs::write(&explicit, "[]").unwrap();

        let detector = SidecarDetector::new(Some(explicit.clone()));
        assert_eq!(detector.sidecar_path(Path::new("/photos/a.jpg")), explicit);
        assert!(detector.detect(Path::new("/photos/a.jpg")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_sidecar() {
        let detector = SidecarDetector::default();
        let result = detector.detect(Path::new("/nonexistent/a.jpg"));
        assert!(matches!(result, Err(VerigrainError::FileNotFound(_))));
    }
}
