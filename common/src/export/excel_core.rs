//! Excel台帳生成（共通ライブラリ）
//!
//! 1画像1行の監査台帳と集計シートを生成

use crate::report::{format_date, LEDGER_HEADERS};
use crate::types::AuditRecord;
use rust_xlsxwriter::*;

/// 台帳をバッファに生成
pub fn generate_ledger_buffer(records: &[AuditRecord], title: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x000000))
        .set_background_color(Color::RGB(0x00FF00))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin);

    let text_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let number_format = Format::new()
        .set_num_format("0.0")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let approved_format = text_format.clone().set_font_color(Color::RGB(0x00A040)).set_bold();
    let failed_format = text_format.clone().set_font_color(Color::RGB(0xE53935)).set_bold();

    // 台帳シート
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Audits")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, header) in LEDGER_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }
    worksheet.set_column_width(0, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet.set_column_width(2, 22)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet.set_column_width(9, 28)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet.set_freeze_panes(1, 0)
        .map_err(|e| format!("固定枠設定エラー: {}", e))?;

    for (idx, record) in records.iter().enumerate() {
        let row = idx as u32 + 1;
        let result = &record.result;

        let date = format_date(&record.date);
        let mode = record.mode.to_string();
        let cells: [(u16, &str); 4] = [
            (0, record.file_name.as_str()),
            (1, date.as_str()),
            (2, record.standard.as_str()),
            (3, mode.as_str()),
        ];
        for (col, value) in cells {
            worksheet.write_string_with_format(row, col, value, &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }

        let counts = [
            result.total,
            result.target_count,
            result.wrong_variety_count,
            result.broken_count,
        ];
        for (offset, count) in counts.iter().enumerate() {
            worksheet.write_number_with_format(row, 4 + offset as u16, *count as f64, &text_format)
                .map_err(|e| format!("値書き込みエラー: {}", e))?;
        }

        // 棄却時は純度セルを空欄
        match result.purity_percent {
            Some(purity) => worksheet.write_number_with_format(row, 8, purity, &number_format),
            None => worksheet.write_blank(row, 8, &number_format),
        }
        .map_err(|e| format!("純度書き込みエラー: {}", e))?;

        let verdict_format = if result.verdict.is_approved() {
            &approved_format
        } else {
            &failed_format
        };
        worksheet.write_string_with_format(row, 9, result.verdict.label(), verdict_format)
            .map_err(|e| format!("判定書き込みエラー: {}", e))?;
    }

    // 集計シート
    let summary = workbook.add_worksheet();
    summary.set_name("Summary")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;
    summary.set_column_width(0, 24)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    let audited = records.len();
    let rejected = records.iter().filter(|r| r.result.is_rejected()).count();
    let approved = records.iter().filter(|r| r.result.verdict.is_approved()).count();

    summary.write_string_with_format(0, 0, title, &header_format)
        .map_err(|e| format!("タイトル書き込みエラー: {}", e))?;
    let rows: [(&str, f64); 3] = [
        ("Samples audited", audited as f64),
        ("Insufficient samples", rejected as f64),
        ("Approved", approved as f64),
    ];
    for (idx, (label, value)) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        summary.write_string_with_format(row, 0, *label, &text_format)
            .map_err(|e| format!("集計書き込みエラー: {}", e))?;
        summary.write_number_with_format(row, 1, *value, &text_format)
            .map_err(|e| format!("集計書き込みエラー: {}", e))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
