use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerigrainError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("検出モデルが利用できません: {0}。`verigrain config --set-model PATH` で設定してください")]
    ModelUnavailable(String),

    #[error("検出器実行エラー: {0}")]
    Detector(String),

    #[error("検出器がタイムアウトしました ({0}秒)")]
    DetectorTimeout(u64),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error(transparent)]
    Common(#[from] verigrain_common::Error),
}

pub type Result<T> = std::result::Result<T, VerigrainError>;
