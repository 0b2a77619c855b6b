//! 外部検出器プロセス連携
//!
//! `<command> <args..> <model> <image> --conf <threshold>` を実行し、
//! 標準出力の検出結果JSONを読む。

use crate::error::{Result, VerigrainError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use verigrain_common::{parse_detections, Detection};

#[derive(Debug, Clone)]
pub struct CommandDetector {
    command: String,
    args: Vec<String>,
    model_path: PathBuf,
    confidence: f32,
    timeout: Duration,
}

impl CommandDetector {
    /// モデルファイルが無い場合は `ModelUnavailable`
    pub fn new(
        command: impl Into<String>,
        args: Vec<String>,
        model_path: &Path,
        confidence: f32,
        timeout: Duration,
    ) -> Result<Self> {
        if !model_path.is_file() {
            return Err(VerigrainError::ModelUnavailable(model_path.display().to_string()));
        }

        Ok(Self {
            command: command.into(),
            args,
            model_path: model_path.to_path_buf(),
            confidence,
            timeout,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub async fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        log::debug!(
            "検出器起動: {} {:?} {} {}",
            self.command,
            self.args,
            self.model_path.display(),
            image.display()
        );

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(&self.model_path)
            .arg(image)
            .arg("--conf")
            .arg(format!("{:.2}", self.confidence))
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| VerigrainError::DetectorTimeout(self.timeout.as_secs()))?
            .map_err(|e| VerigrainError::Detector(format!("{} の起動に失敗: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VerigrainError::Detector(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let preview: String = stdout.chars().take(300).collect();
        log::trace!("検出器出力: {}", preview);

        parse_detections(&stdout).map_err(|e| {
            VerigrainError::Detector(format!("{} の出力を解析できません: {}", image.display(), e))
        })
    }
}
