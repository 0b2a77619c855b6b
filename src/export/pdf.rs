//! PDF監査レポート
//!
//! 表紙（集計）+ 1画像1ページ。フォントは組み込みHelveticaのみ使用する。

use crate::audit::summarize;
use crate::cli::PdfQuality;
use crate::error::{Result, VerigrainError};
use ::image::codecs::jpeg::JpegEncoder;
use printpdf::*;
use std::path::Path;
use verigrain_common::layout::{
    mm_to_pt, A4_HEIGHT_MM, A4_WIDTH_MM, FIELD_ROW_MM, MARGIN_MM, PHOTO_HEIGHT_MM, PURITY_BAR_MM,
    USABLE_WIDTH_MM, VERDICT_BAND_MM,
};
use verigrain_common::{build_report_fields, format_purity, AuditRecord};

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const FIELD_VALUE_X_MM: f32 = MARGIN_MM + 45.0;

const BLACK: [u8; 3] = [0x00, 0x00, 0x00];
const WHITE: [u8; 3] = [0xFF, 0xFF, 0xFF];

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(Rgb {
        r: color[0] as f32 / 255.0,
        g: color[1] as f32 / 255.0,
        b: color[2] as f32 / 255.0,
        icc_profile: None,
    })
}

fn text_ops(text: &str, x_mm: f32, y_mm: f32, size: f32, font: BuiltinFont) -> Vec<Op> {
    colored_text_ops(text, x_mm, y_mm, size, font, BLACK)
}

fn colored_text_ops(text: &str, x_mm: f32, y_mm: f32, size: f32, font: BuiltinFont, color: [u8; 3]) -> Vec<Op> {
    vec![
        Op::SetFillColor { col: rgb(color) },
        Op::StartTextSection,
        Op::SetTextCursor { pos: Point::new(Mm(x_mm), Mm(y_mm)) },
        Op::SetFontSizeBuiltinFont { size: Pt(size), font },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        },
        Op::EndTextSection,
    ]
}

fn rect_ops(x_mm: f32, y_mm: f32, w_mm: f32, h_mm: f32, color: [u8; 3]) -> Vec<Op> {
    let corners = [
        (x_mm, y_mm),
        (x_mm + w_mm, y_mm),
        (x_mm + w_mm, y_mm + h_mm),
        (x_mm, y_mm + h_mm),
    ];
    let points = corners
        .iter()
        .map(|&(x, y)| LinePoint { p: Point::new(Mm(x), Mm(y)), bezier: false })
        .collect();

    vec![
        Op::SetFillColor { col: rgb(color) },
        Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        },
    ]
}

/// 写真をJPEGに縮小してPDFに登録し、配置オペレーションを返す
fn photo_ops(doc: &mut PdfDocument, file_path: &str, quality: PdfQuality, top_mm: f32) -> Result<Vec<Op>> {
    let img = ::image::open(file_path).map_err(|e| VerigrainError::ImageLoad(format!("{}: {}", file_path, e)))?;
    let max_w = quality.max_width();
    let img = if img.width() > max_w {
        let h = (img.height() as f64 * max_w as f64 / img.width() as f64).round() as u32;
        img.resize_exact(max_w, h.max(1), ::image::imageops::FilterType::Triangle)
    } else {
        img
    };
    let rgb_img = img.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality())
        .encode_image(&rgb_img)
        .map_err(|e| VerigrainError::ImageLoad(format!("JPEGエンコードエラー: {}", e)))?;

    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(&jpeg, &mut warnings)
        .map_err(|e| VerigrainError::PdfGeneration(format!("画像埋め込みエラー: {}", e)))?;
    let image_id = doc.add_image(&raw);

    // dpi=72 で 1px = 1pt。枠に収まる単一倍率で縮小
    let (w_px, h_px) = (rgb_img.width() as f32, rgb_img.height() as f32);
    let box_w = mm_to_pt(USABLE_WIDTH_MM);
    let box_h = mm_to_pt(PHOTO_HEIGHT_MM);
    let scale = (box_w / w_px).min(box_h / h_px);
    let drawn_w = w_px * scale;
    let drawn_h = h_px * scale;

    let x = mm_to_pt(MARGIN_MM) + (box_w - drawn_w) / 2.0;
    let y = mm_to_pt(top_mm) - drawn_h;

    Ok(vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x)),
            translate_y: Some(Pt(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(72.0),
            ..Default::default()
        },
    }])
}

fn cover_page(records: &[AuditRecord], title: &str) -> PdfPage {
    let summary = summarize(records);
    let generated = chrono::Local::now().format("%Y/%m/%d %H:%M").to_string();
    let mut ops = Vec::new();

    let mut y = A4_HEIGHT_MM - MARGIN_MM - 10.0;
    ops.extend(text_ops(title, MARGIN_MM, y, TITLE_SIZE + 6.0, BuiltinFont::HelveticaBold));
    y -= 10.0;
    ops.extend(text_ops(
        &format!("Generated {}", generated),
        MARGIN_MM,
        y,
        BODY_SIZE,
        BuiltinFont::Helvetica,
    ));
    y -= 16.0;

    let rows = [
        ("Samples audited", summary.audited.to_string()),
        ("Approved", summary.approved.to_string()),
        ("Insufficient samples", summary.rejected.to_string()),
        ("Mean purity", format_purity(summary.mean_purity)),
    ];
    for (label, value) in rows {
        ops.extend(text_ops(label, MARGIN_MM, y, BODY_SIZE + 2.0, BuiltinFont::HelveticaBold));
        ops.extend(text_ops(&value, FIELD_VALUE_X_MM + 20.0, y, BODY_SIZE + 2.0, BuiltinFont::Helvetica));
        y -= FIELD_ROW_MM + 2.0;
    }

    y -= 6.0;
    for record in records {
        if y < MARGIN_MM + FIELD_ROW_MM {
            break;
        }
        let line = format!(
            "{}  |  {}  |  {}",
            record.file_name,
            format_purity(record.result.purity_percent),
            record.result.verdict
        );
        ops.extend(rect_ops(MARGIN_MM, y - 1.0, 3.0, 4.0, record.result.verdict.color()));
        ops.extend(text_ops(&line, MARGIN_MM + 6.0, y, BODY_SIZE, BuiltinFont::Helvetica));
        y -= FIELD_ROW_MM - 1.0;
    }

    PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops)
}

fn record_page(doc: &mut PdfDocument, record: &AuditRecord, quality: PdfQuality) -> PdfPage {
    let result = &record.result;
    let mut ops = Vec::new();

    let mut y = A4_HEIGHT_MM - MARGIN_MM - 8.0;
    ops.extend(text_ops(
        &format!("Quality Check: {}", record.standard),
        MARGIN_MM,
        y,
        TITLE_SIZE,
        BuiltinFont::HelveticaBold,
    ));
    y -= 8.0;
    ops.extend(text_ops(&record.file_name, MARGIN_MM, y, BODY_SIZE, BuiltinFont::Helvetica));

    // 写真
    let photo_top = y - 4.0;
    if !record.file_path.is_empty() {
        match photo_ops(doc, &record.file_path, quality, photo_top) {
            Ok(photo) => ops.extend(photo),
            Err(e) => log::warn!("写真を配置できません {}: {}", record.file_name, e),
        }
    }
    y = photo_top - PHOTO_HEIGHT_MM - 6.0;

    // 判定帯
    let band_y = y - VERDICT_BAND_MM;
    ops.extend(rect_ops(MARGIN_MM, band_y, USABLE_WIDTH_MM, VERDICT_BAND_MM, result.verdict.color()));
    ops.extend(colored_text_ops(
        &result.message(),
        MARGIN_MM + 4.0,
        band_y + 5.0,
        BODY_SIZE + 1.0,
        BuiltinFont::HelveticaBold,
        WHITE,
    ));
    y = band_y - 3.0;

    // 純度バー
    let bar_y = y - PURITY_BAR_MM;
    ops.extend(rect_ops(MARGIN_MM, bar_y, USABLE_WIDTH_MM, PURITY_BAR_MM, [0xE0, 0xE0, 0xE0]));
    if let Some(purity) = result.purity_percent {
        let filled = USABLE_WIDTH_MM * (purity as f32 / 100.0);
        if filled > 0.0 {
            ops.extend(rect_ops(MARGIN_MM, bar_y, filled, PURITY_BAR_MM, result.verdict.color()));
        }
    }
    y = bar_y - FIELD_ROW_MM - 2.0;

    for field in build_report_fields(record) {
        ops.extend(text_ops(field.label, MARGIN_MM, y, BODY_SIZE, BuiltinFont::HelveticaBold));
        ops.extend(text_ops(&field.value, FIELD_VALUE_X_MM, y, BODY_SIZE, BuiltinFont::Helvetica));
        y -= FIELD_ROW_MM;
    }

    PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops)
}

pub fn generate_pdf(records: &[AuditRecord], output_path: &Path, title: &str, quality: PdfQuality) -> Result<()> {
    let mut doc = PdfDocument::new(title);

    let mut pages = vec![cover_page(records, title)];
    for record in records {
        pages.push(record_page(&mut doc, record, quality));
    }

    let mut warnings = Vec::new();
    let bytes = doc.with_pages(pages).save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF警告: {}件", warnings.len());
    }

    std::fs::write(output_path, bytes)
        .map_err(|e| VerigrainError::PdfGeneration(format!("PDF保存エラー: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_ops_downscales_and_places_image() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("wide.png");
        ::image::RgbImage::from_pixel(1200, 600, ::image::Rgb([230, 220, 200]))
            .save(&photo)
            .unwrap();

        let mut doc = PdfDocument::new("photo");
        let ops = photo_ops(&mut doc, &photo.display().to_string(), PdfQuality::Low, 250.0).unwrap();
        assert_eq!(ops.len(), 1);
        assert!(matches!(ops[0], Op::UseXobject { .. }));
    }

    #[test]
    fn test_photo_ops_missing_file() {
        let mut doc = PdfDocument::new("photo");
        let result = photo_ops(&mut doc, "/nonexistent/grains.jpg", PdfQuality::Medium, 250.0);
        assert!(matches!(result, Err(VerigrainError::ImageLoad(_))));
    }
}
