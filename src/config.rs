use crate::error::{Result, VerigrainError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use verigrain_common::{UserMode, VarietyTable, DEFAULT_CONFIDENCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 検出モデルの重みファイル
    pub model_path: PathBuf,
    /// 外部検出器コマンド
    pub detector_command: String,
    /// 検出器への追加引数（モデル・画像パスの前に渡す）
    pub detector_args: Vec<String>,
    pub confidence_threshold: f32,
    pub timeout_seconds: u64,
    pub default_mode: UserMode,
    /// カスタム品種表（JSON）。未設定ならプリセット
    pub variety_table: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best.pt"),
            detector_command: "verigrain-detect".into(),
            detector_args: Vec::new(),
            confidence_threshold: DEFAULT_CONFIDENCE,
            timeout_seconds: 120,
            default_mode: UserMode::Consumer,
            variety_table: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VerigrainError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("verigrain").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(VerigrainError::Config(format!(
                "confidence_threshold は0.0-1.0で指定してください: {}",
                self.confidence_threshold
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(VerigrainError::Config("timeout_seconds は1以上を指定してください".into()));
        }
        Ok(())
    }

    /// 品種表を取得（カスタム表があれば優先）
    pub fn variety_table(&self) -> Result<VarietyTable> {
        match &self.variety_table {
            Some(path) => {
                if !path.exists() {
                    return Err(VerigrainError::FileNotFound(path.display().to_string()));
                }
                Ok(VarietyTable::from_file(path)?)
            }
            None => Ok(VarietyTable::presets()),
        }
    }

    pub fn set_model(&mut self, path: PathBuf) -> Result<()> {
        self.model_path = path;
        self.save()
    }

    pub fn set_detector(&mut self, command: String, args: Vec<String>) -> Result<()> {
        self.detector_command = command;
        self.detector_args = args;
        self.save()
    }
}
