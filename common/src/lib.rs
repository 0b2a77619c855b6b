//! VeriGrain Common Library
//!
//! 純度評価・品種基準・レポート項目など、CLIとエクスポータで共有される型とロジック

pub mod error;
pub mod export;
pub mod layout;
pub mod parser;
pub mod purity;
pub mod report;
pub mod standard;
pub mod types;

pub use error::{Error, Result};
pub use parser::{extract_json, parse_detections};
pub use purity::{evaluate, evaluate_detections, normalize_label, DEFAULT_CONFIDENCE, MIN_GRAINS};
pub use report::{build_report_fields, format_purity, ReportField};
pub use standard::{GrainShape, Standard, VarietyEntry, VarietyTable};
pub use types::{AuditRecord, AuditResult, Detection, UserMode, Verdict};
