//! レポート共通処理
//!
//! PDF/Excel/端末出力で使う表示項目の組み立て

use crate::types::{AuditRecord, UserMode};

/// レポートの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

impl ReportField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

/// 純度表示 ("80.0%" / 棄却時 "-")
pub fn format_purity(purity: Option<f64>) -> String {
    purity.map(|p| format!("{:.1}%", p)).unwrap_or_else(|| "-".to_string())
}

/// 日時フォーマット変換: "2025-12-26 13:47:52" → "2025/12/26 13:47"
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return "-".to_string();
    }
    date.replace('-', "/").chars().take(16).collect()
}

/// 表示項目を構築
///
/// 監査モードでは混入内訳（他品種・砕米）を追加する。
pub fn build_report_fields(record: &AuditRecord) -> Vec<ReportField> {
    let result = &record.result;
    let mut fields = vec![
        ReportField::new("File", record.file_name.clone()),
        ReportField::new("Captured", format_date(&record.date)),
        ReportField::new("Standard", record.standard.clone()),
        ReportField::new("Mode", record.mode.to_string()),
        ReportField::new("Total Grains", result.total.to_string()),
        ReportField::new("Target Grains", result.target_count.to_string()),
    ];

    match record.mode {
        UserMode::Consumer => {
            fields.push(ReportField::new("Adulterants", result.adulterant_count.to_string()));
        }
        UserMode::Industry => {
            fields.push(ReportField::new("Wrong Variety", result.wrong_variety_count.to_string()));
            fields.push(ReportField::new("Broken/Dust", result.broken_count.to_string()));
        }
    }

    fields.push(ReportField::new("Purity Score", format_purity(result.purity_percent)));
    fields.push(ReportField::new("Verdict", result.verdict.label()));
    fields
}

/// 台帳の列見出し
pub const LEDGER_HEADERS: &[&str] = &[
    "File",
    "Captured",
    "Standard",
    "Mode",
    "Total",
    "Target",
    "Wrong Variety",
    "Broken/Dust",
    "Purity (%)",
    "Verdict",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditResult, Verdict};

    fn record(mode: UserMode, purity: Option<f64>, verdict: Verdict) -> AuditRecord {
        AuditRecord {
            file_name: "batch-01.jpg".to_string(),
            file_path: String::new(),
            date: "2025-12-26 13:47:52".to_string(),
            standard: "Ponni Rice".to_string(),
            mode,
            result: AuditResult {
                total: 20,
                target_count: 17,
                adulterant_count: 3,
                wrong_variety_count: 1,
                broken_count: 2,
                purity_percent: purity,
                verdict,
            },
        }
    }

    #[test]
    fn test_consumer_fields() {
        let fields = build_report_fields(&record(UserMode::Consumer, Some(85.0), Verdict::Average));
        let labels: Vec<&str> = fields.iter().map(|f| f.label).collect();
        assert!(labels.contains(&"Adulterants"));
        assert!(!labels.contains(&"Broken/Dust"));
        assert_eq!(fields[1].value, "2025/12/26 13:47");
        assert_eq!(fields.last().unwrap().value, "AVERAGE QUALITY");
    }

    #[test]
    fn test_industry_fields_split_adulterants() {
        let fields = build_report_fields(&record(UserMode::Industry, Some(85.0), Verdict::Reject));
        let wrong = fields.iter().find(|f| f.label == "Wrong Variety").unwrap();
        let broken = fields.iter().find(|f| f.label == "Broken/Dust").unwrap();
        assert_eq!(wrong.value, "1");
        assert_eq!(broken.value, "2");
    }

    #[test]
    fn test_rejected_purity_placeholder() {
        let fields = build_report_fields(&record(UserMode::Consumer, None, Verdict::InsufficientSample));
        let purity = fields.iter().find(|f| f.label == "Purity Score").unwrap();
        assert_eq!(purity.value, "-");
    }

    #[test]
    fn test_format_date_empty() {
        assert_eq!(format_date(""), "-");
        assert_eq!(format_date("2025-01-18"), "2025/01/18");
    }

    #[test]
    fn test_format_date_multibyte() {
        assert_eq!(format_date("2025年12月26日 13時47分"), "2025年12月26日 13時4");
        assert_eq!(format_date("２０２５－１２－２６ １３：４７：５２"), "２０２５－１２－２６ １３：４７");
    }
}
