pub mod card;
pub mod excel;
pub mod pdf;

use crate::cli::{ExportFormat, PdfQuality};
use crate::error::Result;
use std::path::{Path, PathBuf};
use verigrain_common::AuditRecord;

fn is_file_target(output: &Path) -> bool {
    !output.is_dir() && output.extension().is_some()
}

/// 単一形式の出力先（ディレクトリなら `<title>.<ext>`）
fn output_path_for_format(output: &Path, title: &str, extension: &str) -> PathBuf {
    if is_file_target(output) {
        output.to_path_buf()
    } else {
        output.join(format!("{}.{}", title, extension))
    }
}

/// 複数形式の出力先（ファイル指定ならその stem を共有）
fn output_path_for_all(output: &Path, title: &str, extension: &str) -> PathBuf {
    if is_file_target(output) {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(title);
        parent.join(format!("{}.{}", stem, extension))
    } else {
        output.join(format!("{}.{}", title, extension))
    }
}

fn card_dir(output: &Path) -> PathBuf {
    if is_file_target(output) {
        output.parent().unwrap_or_else(|| Path::new(".")).to_path_buf()
    } else {
        output.to_path_buf()
    }
}

pub fn write_json(records: &[AuditRecord], output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(output_path, json)?;
    Ok(())
}

pub fn export_records(
    records: &[AuditRecord],
    format: ExportFormat,
    output: &Path,
    title: &str,
    pdf_quality: PdfQuality,
) -> Result<()> {
    let dir = card_dir(output);
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&dir)?;
    }

    let path_for = |extension: &str| {
        if format == ExportFormat::All {
            output_path_for_all(output, title, extension)
        } else {
            output_path_for_format(output, title, extension)
        }
    };

    if format.includes(ExportFormat::Json) {
        let path = path_for("json");
        write_json(records, &path)?;
        println!("✔ JSON出力: {}", path.display());
    }

    if format.includes(ExportFormat::Pdf) {
        let path = path_for("pdf");
        println!("- PDFを生成中... (品質: {})", pdf_quality);
        pdf::generate_pdf(records, &path, title, pdf_quality)?;
        println!("✔ PDF出力: {}", path.display());
    }

    if format.includes(ExportFormat::Excel) {
        let path = path_for("xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(records, &path, title)?;
        println!("✔ Excel出力: {}", path.display());
    }

    if format.includes(ExportFormat::Card) {
        println!("- カード画像を生成中...");
        let paths = card::export_cards(records, &dir)?;
        println!("✔ カード出力: {}枚 ({})", paths.len(), dir.display());
    }

    Ok(())
}
