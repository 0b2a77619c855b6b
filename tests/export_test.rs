//! PDF/Excel/カード出力の統合テスト

use image::{Rgb, RgbImage};
use tempfile::tempdir;
use verigrain::cli::{ExportFormat, PdfQuality};
use verigrain::export::{self, excel, pdf};
use verigrain_common::{AuditRecord, AuditResult, UserMode, Verdict};

fn create_test_record(index: usize, file_path: String, purity: Option<f64>, verdict: Verdict) -> AuditRecord {
    AuditRecord {
        file_name: format!("lot_{}.png", index),
        file_path,
        date: "2026-01-18 09:30:00".to_string(),
        standard: "Sona Masoori".to_string(),
        mode: UserMode::Industry,
        result: AuditResult {
            total: 40,
            target_count: 36,
            adulterant_count: 4,
            wrong_variety_count: 1,
            broken_count: 3,
            purity_percent: purity,
            verdict,
        },
    }
}

fn sample_records() -> Vec<AuditRecord> {
    vec![
        create_test_record(1, String::new(), Some(90.0), Verdict::Certified),
        create_test_record(2, String::new(), Some(72.5), Verdict::Reject),
        create_test_record(3, String::new(), None, Verdict::InsufficientSample),
    ]
}

#[test]
fn test_pdf_generation_without_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("audit.pdf");

    let result = pdf::generate_pdf(&sample_records(), &output_path, "Mill Audit", PdfQuality::Medium);
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());

    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダがない");
}

#[test]
fn test_pdf_generation_with_photo() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = dir.path().join("grains.png");
    RgbImage::from_pixel(640, 480, Rgb([220, 210, 190])).save(&photo).unwrap();

    let records = vec![create_test_record(1, photo.display().to_string(), Some(95.0), Verdict::Certified)];
    let output_path = dir.path().join("photo.pdf");
    pdf::generate_pdf(&records, &output_path, "Mill Audit", PdfQuality::Low).unwrap();

    assert!(std::fs::metadata(&output_path).unwrap().len() > 0);
}

#[test]
fn test_pdf_generation_empty_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("empty.pdf");

    pdf::generate_pdf(&[], &output_path, "Empty", PdfQuality::Medium).unwrap();
    assert!(output_path.exists());
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("ledger.xlsx");

    excel::generate_excel(&sample_records(), &output_path, "Mill Audit").unwrap();

    let bytes = std::fs::read(&output_path).unwrap();
    assert!(bytes.starts_with(b"PK"), "xlsx(zip)ヘッダがない");
}

#[test]
fn test_export_all_to_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("reports");

    export::export_records(&sample_records(), ExportFormat::All, &out, "lot-report", PdfQuality::Low).unwrap();

    assert!(out.join("lot-report.json").exists());
    assert!(out.join("lot-report.pdf").exists());
    assert!(out.join("lot-report.xlsx").exists());
    for i in 1..=3 {
        assert!(out.join(format!("lot_{}_card.png", i)).exists());
    }
}

#[test]
fn test_export_single_file_target() {
    let dir = tempdir().expect("Failed to create temp dir");
    let target = dir.path().join("week42.xlsx");

    export::export_records(&sample_records(), ExportFormat::Excel, &target, "ignored", PdfQuality::Medium).unwrap();

    assert!(target.exists());
    assert!(!dir.path().join("ignored.xlsx").exists());
}
