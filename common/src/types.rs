//! 監査の型定義
//!
//! CLIとエクスポータで共有される型:
//! - Detection: 検出器の出力（形状ラベル + 信頼度）
//! - AuditResult: 1画像ぶんの純度評価
//! - AuditRecord: 画像メタデータ付きの監査結果（台帳の1行）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 検出器が返す1粒ぶんの検出結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// 形状ラベル ("premium" / "mid" / "medium" / "low")
    pub label: String,

    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// バウンディングボックス [x1, y1, x2, y2]（px）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
}

fn default_confidence() -> f32 {
    1.0
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox: None,
        }
    }
}

/// 利用モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserMode {
    /// 一般消費者向け（>85 で合格）
    #[default]
    Consumer,
    /// 精米所監査向け（>=90 で認証）
    Industry,
}

impl std::str::FromStr for UserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "consumer" | "c" => Ok(UserMode::Consumer),
            "industry" | "audit" | "industry-audit" | "i" => Ok(UserMode::Industry),
            _ => Err(format!("Unknown mode: {}. Use consumer or industry", s)),
        }
    }
}

impl fmt::Display for UserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserMode::Consumer => write!(f, "consumer"),
            UserMode::Industry => write!(f, "industry"),
        }
    }
}

/// 判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// 検出数が10粒未満（純度は算出しない）
    InsufficientSample,
    Excellent,
    Average,
    LowQuality,
    Certified,
    Reject,
}

impl Verdict {
    /// 一般消費者向けの閾値
    pub fn consumer(purity: f64) -> Self {
        if purity > 85.0 {
            Verdict::Excellent
        } else if purity > 70.0 {
            Verdict::Average
        } else {
            Verdict::LowQuality
        }
    }

    /// 監査向けの閾値（消費者向けより厳しい）
    pub fn industry(purity: f64) -> Self {
        if purity < 90.0 {
            Verdict::Reject
        } else {
            Verdict::Certified
        }
    }

    pub fn for_mode(mode: UserMode, purity: f64) -> Self {
        match mode {
            UserMode::Consumer => Self::consumer(purity),
            UserMode::Industry => Self::industry(purity),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::InsufficientSample => "OBJECT NOT RECOGNIZED",
            Verdict::Excellent => "EXCELLENT QUALITY",
            Verdict::Average => "AVERAGE QUALITY",
            Verdict::LowQuality => "LOW QUALITY / ADULTERATED",
            Verdict::Certified => "CERTIFIED",
            Verdict::Reject => "REJECT",
        }
    }

    /// 合格扱いかどうか
    pub fn is_approved(&self) -> bool {
        matches!(self, Verdict::Excellent | Verdict::Certified)
    }

    /// カード・PDFの帯色 (RGB)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Verdict::Excellent | Verdict::Certified => [0x00, 0xC8, 0x53],
            Verdict::Average => [0xFF, 0xB3, 0x00],
            Verdict::LowQuality | Verdict::Reject => [0xE5, 0x39, 0x35],
            Verdict::InsufficientSample => [0x75, 0x75, 0x75],
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 1画像ぶんの純度評価
///
/// `target_count + adulterant_count == total` を常に満たす。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub total: usize,
    pub target_count: usize,
    pub adulterant_count: usize,
    /// 非対象のうち "low" 以外（他品種混入）
    pub wrong_variety_count: usize,
    /// 非対象のうち "low"（砕米・粉）
    pub broken_count: usize,
    /// 棄却時は None
    pub purity_percent: Option<f64>,
    pub verdict: Verdict,
}

impl AuditResult {
    pub fn is_rejected(&self) -> bool {
        self.verdict == Verdict::InsufficientSample
    }

    pub fn adulteration_percent(&self) -> Option<f64> {
        self.purity_percent.map(|p| 100.0 - p)
    }

    /// 表示用メッセージ
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::InsufficientSample => format!(
                "OBJECT NOT RECOGNIZED: only {} shapes detected. Valid audit requires 10+ grains.",
                self.total
            ),
            Verdict::Excellent => "EXCELLENT QUALITY. Matches standards.".to_string(),
            Verdict::Average => "AVERAGE QUALITY. Mixed sizes detected.".to_string(),
            Verdict::LowQuality => "LOW QUALITY / ADULTERATED.".to_string(),
            Verdict::Certified => "CERTIFIED: Batch meets export standards.".to_string(),
            Verdict::Reject => format!(
                "REJECT: Adulteration {:.1}% exceeds limit.",
                self.adulteration_percent().unwrap_or(100.0)
            ),
        }
    }
}

/// 監査台帳の1行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub file_name: String,

    /// 画像ファイルの絶対パス（PDF・カード出力時に使用）
    #[serde(default)]
    pub file_path: String,

    /// 撮影日時（EXIF DateTimeOriginal）
    #[serde(default)]
    pub date: String,

    /// 照合した基準の表示名
    pub standard: String,

    #[serde(default)]
    pub mode: UserMode,

    pub result: AuditResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_thresholds() {
        assert_eq!(Verdict::consumer(86.0), Verdict::Excellent);
        assert_eq!(Verdict::consumer(85.0), Verdict::Average);
        assert_eq!(Verdict::consumer(75.0), Verdict::Average);
        assert_eq!(Verdict::consumer(70.0), Verdict::LowQuality);
        assert_eq!(Verdict::consumer(50.0), Verdict::LowQuality);
    }

    #[test]
    fn test_industry_thresholds() {
        assert_eq!(Verdict::industry(95.0), Verdict::Certified);
        assert_eq!(Verdict::industry(90.0), Verdict::Certified);
        assert_eq!(Verdict::industry(89.9), Verdict::Reject);
    }

    #[test]
    fn test_thresholds_differ_between_modes() {
        // 88% は消費者向けでは合格、監査向けでは不合格
        assert!(Verdict::for_mode(UserMode::Consumer, 88.0).is_approved());
        assert!(!Verdict::for_mode(UserMode::Industry, 88.0).is_approved());
    }

    #[test]
    fn test_user_mode_from_str() {
        assert_eq!("Consumer".parse::<UserMode>().unwrap(), UserMode::Consumer);
        assert_eq!("industry".parse::<UserMode>().unwrap(), UserMode::Industry);
        assert_eq!("audit".parse::<UserMode>().unwrap(), UserMode::Industry);
        assert!("retail".parse::<UserMode>().is_err());
    }

    #[test]
    fn test_detection_deserialize_defaults() {
        let json = r#"{"label": "premium"}"#;
        let det: Detection = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(det.label, "premium");
        assert_eq!(det.confidence, 1.0);
        assert!(det.bbox.is_none());
    }

    #[test]
    fn test_reject_message_reports_adulteration() {
        let result = AuditResult {
            total: 10,
            target_count: 8,
            adulterant_count: 2,
            wrong_variety_count: 1,
            broken_count: 1,
            purity_percent: Some(80.0),
            verdict: Verdict::Reject,
        };
        assert_eq!(result.message(), "REJECT: Adulteration 20.0% exceeds limit.");
    }

    #[test]
    fn test_audit_record_serialize() {
        let record = AuditRecord {
            file_name: "sample.jpg".to_string(),
            file_path: String::new(),
            date: String::new(),
            standard: "Basmati (Premium)".to_string(),
            mode: UserMode::Industry,
            result: AuditResult {
                total: 3,
                target_count: 3,
                adulterant_count: 0,
                wrong_variety_count: 0,
                broken_count: 0,
                purity_percent: None,
                verdict: Verdict::InsufficientSample,
            },
        };

        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"fileName\":\"sample.jpg\""));
        assert!(json.contains("\"mode\":\"industry\""));
        assert!(json.contains("\"verdict\":\"insufficient_sample\""));
        assert!(json.contains("\"purityPercent\":null"));
    }
}
