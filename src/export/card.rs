//! 共有カード画像
//!
//! 写真 + 判定色の帯 + 純度バーを1枚のPNGに合成する。

use crate::error::{Result, VerigrainError};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use verigrain_common::layout::{CARD_BAND_PX, CARD_BAR_PX, CARD_WIDTH_PX};
use verigrain_common::AuditRecord;

const BACKGROUND: Rgb<u8> = Rgb([0x0E, 0x11, 0x17]);
const BAR_TRACK: Rgb<u8> = Rgb([0x26, 0x27, 0x30]);
/// 写真が読めない場合の高さ
const PLACEHOLDER_HEIGHT_PX: u32 = 400;

fn fill_rect(canvas: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(canvas.width());
    let y_end = (y + h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn load_photo(file_path: &str) -> Option<RgbImage> {
    if file_path.is_empty() {
        return None;
    }
    match image::open(file_path) {
        Ok(img) => {
            let h = (img.height() as f64 * CARD_WIDTH_PX as f64 / img.width().max(1) as f64).round() as u32;
            Some(img.resize_exact(CARD_WIDTH_PX, h.max(1), FilterType::Triangle).to_rgb8())
        }
        Err(e) => {
            log::warn!("カード用の写真を読み込めません {}: {}", file_path, e);
            None
        }
    }
}

/// カード画像を合成
pub fn render_card(record: &AuditRecord) -> RgbImage {
    let photo = load_photo(&record.file_path);
    let photo_h = photo.as_ref().map(|p| p.height()).unwrap_or(PLACEHOLDER_HEIGHT_PX);
    let height = photo_h + CARD_BAND_PX + CARD_BAR_PX;

    let mut canvas = RgbImage::from_pixel(CARD_WIDTH_PX, height, BACKGROUND);
    if let Some(photo) = &photo {
        imageops::overlay(&mut canvas, photo, 0, 0);
    }

    let color = Rgb(record.result.verdict.color());
    fill_rect(&mut canvas, 0, photo_h, CARD_WIDTH_PX, CARD_BAND_PX, color);

    let bar_y = photo_h + CARD_BAND_PX;
    fill_rect(&mut canvas, 0, bar_y, CARD_WIDTH_PX, CARD_BAR_PX, BAR_TRACK);
    if let Some(purity) = record.result.purity_percent {
        let filled = (CARD_WIDTH_PX as f64 * purity / 100.0).round() as u32;
        fill_rect(&mut canvas, 0, bar_y, filled, CARD_BAR_PX, color);
    }

    canvas
}

pub fn card_path(output_dir: &Path, record: &AuditRecord) -> PathBuf {
    let stem = Path::new(&record.file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audit");
    output_dir.join(format!("{}_card.png", stem))
}

/// 全レコードのカードを並列に書き出す
pub fn export_cards(records: &[AuditRecord], output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    records
        .par_iter()
        .map(|record| -> Result<PathBuf> {
            let path = card_path(output_dir, record);
            render_card(record)
                .save(&path)
                .map_err(|e| VerigrainError::ImageLoad(format!("カード保存エラー {}: {}", path.display(), e)))?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verigrain_common::{AuditResult, UserMode, Verdict};

    fn record(file_path: String, purity: Option<f64>, verdict: Verdict) -> AuditRecord {
        AuditRecord {
            file_name: "lot-3.jpg".to_string(),
            file_path,
            date: String::new(),
            standard: "Basmati (Premium)".to_string(),
            mode: UserMode::Consumer,
            result: AuditResult {
                total: 20,
                target_count: 10,
                adulterant_count: 10,
                wrong_variety_count: 10,
                broken_count: 0,
                purity_percent: purity,
                verdict,
            },
        }
    }

    #[test]
    fn test_card_without_photo() {
        let card = render_card(&record(String::new(), Some(50.0), Verdict::LowQuality));
        assert_eq!(card.width(), CARD_WIDTH_PX);
        assert_eq!(card.height(), PLACEHOLDER_HEIGHT_PX + CARD_BAND_PX + CARD_BAR_PX);

        let bar_y = PLACEHOLDER_HEIGHT_PX + CARD_BAND_PX;
        let red = Rgb(Verdict::LowQuality.color());
        assert_eq!(*card.get_pixel(0, PLACEHOLDER_HEIGHT_PX), red);
        assert_eq!(*card.get_pixel(10, bar_y), red);
        assert_eq!(*card.get_pixel(CARD_WIDTH_PX - 10, bar_y), BAR_TRACK);
    }

    #[test]
    fn test_card_scales_photo() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("grains.png");
        RgbImage::from_pixel(300, 150, Rgb([200, 190, 170])).save(&photo).unwrap();

        let card = render_card(&record(photo.display().to_string(), Some(90.0), Verdict::Excellent));
        assert_eq!(card.height(), 300 + CARD_BAND_PX + CARD_BAR_PX);
        assert_eq!(*card.get_pixel(5, 5), Rgb([200, 190, 170]));
    }

    #[test]
    fn test_export_cards_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_cards(&[record(String::new(), None, Verdict::InsufficientSample)], dir.path()).unwrap();
        assert_eq!(paths, vec![dir.path().join("lot-3_card.png")]);
        assert!(paths[0].exists());
    }
}
