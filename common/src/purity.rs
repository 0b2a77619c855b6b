//! 純度評価
//!
//! 検出ラベル列と基準から対象粒・混入粒を数え、純度と判定を返す。
//! 副作用なしの純粋関数。

use crate::standard::Standard;
use crate::types::{AuditResult, Detection, UserMode, Verdict};

/// 監査成立に必要な最小粒数
pub const MIN_GRAINS: usize = 10;

/// 検出器の信頼度閾値（既定値）
pub const DEFAULT_CONFIDENCE: f32 = 0.50;

/// ラベル正規化（"medium" は "mid" と同一視）
pub fn normalize_label(label: &str) -> &str {
    if label == "medium" {
        "mid"
    } else {
        label
    }
}

/// ラベル列を評価
pub fn evaluate<S: AsRef<str>>(labels: &[S], standard: &Standard, mode: UserMode) -> AuditResult {
    let mut target_count = 0;
    let mut adulterant_count = 0;
    let mut broken_count = 0;

    for label in labels {
        let shape = normalize_label(label.as_ref());
        if standard.is_target(shape) {
            target_count += 1;
        } else {
            adulterant_count += 1;
            if shape == "low" {
                broken_count += 1;
            }
        }
    }

    let total = target_count + adulterant_count;

    let (purity_percent, verdict) = if total < MIN_GRAINS {
        (None, Verdict::InsufficientSample)
    } else {
        let purity = 100.0 * target_count as f64 / total as f64;
        (Some(purity), Verdict::for_mode(mode, purity))
    };

    AuditResult {
        total,
        target_count,
        adulterant_count,
        wrong_variety_count: adulterant_count - broken_count,
        broken_count,
        purity_percent,
        verdict,
    }
}

/// 信頼度で足切りしてから評価
pub fn evaluate_detections(
    detections: &[Detection],
    standard: &Standard,
    mode: UserMode,
    min_confidence: f32,
) -> AuditResult {
    let labels: Vec<&str> = detections
        .iter()
        .filter(|d| d.confidence >= min_confidence)
        .map(|d| d.label.as_str())
        .collect();
    evaluate(&labels, standard, mode)
}
