//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown variety: {0}")]
    UnknownVariety(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse() {
        let error = Error::Parse("JSONが見つかりません".to_string());
        assert_eq!(error.to_string(), "Parse error: JSONが見つかりません");
    }

    #[test]
    fn test_variety_table_error_is_config() {
        let error = crate::VarietyTable::from_json("[]").unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn test_error_display_unknown_variety() {
        let error = Error::UnknownVariety("Arborio".to_string());
        assert_eq!(format!("{}", error), "Unknown variety: Arborio");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
