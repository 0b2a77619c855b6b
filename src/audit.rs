//! 監査処理
//!
//! 画像ごとに検出 → 純度評価 → 台帳レコード化を行う。

use crate::detector::cache::compute_file_hash;
use crate::detector::{CacheFile, Detector};
use crate::error::Result;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use verigrain_common::{evaluate_detections, AuditRecord, AuditResult, Standard, UserMode};

/// 評価条件
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub standard: Standard,
    pub mode: UserMode,
    pub min_confidence: f32,
}

/// 集計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub audited: usize,
    pub rejected: usize,
    pub approved: usize,
    /// 棄却以外の平均純度
    pub mean_purity: Option<f64>,
}

pub fn build_record(image: &ImageInfo, options: &AuditOptions, result: AuditResult) -> AuditRecord {
    AuditRecord {
        file_name: image.file_name.clone(),
        file_path: image.path.display().to_string(),
        date: image.date.clone().unwrap_or_default(),
        standard: options.standard.name.clone(),
        mode: options.mode,
        result,
    }
}

fn progress_bar(len: usize, verbose: bool) -> ProgressBar {
    if verbose || len < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("  {bar:30.green/white} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// 画像を順に監査（入力順を保つ）
pub async fn audit_images(
    images: &[ImageInfo],
    detector: &Detector,
    options: &AuditOptions,
    verbose: bool,
) -> Result<Vec<AuditRecord>> {
    detector.check_image_count(images.len())?;
    let bar = progress_bar(images.len(), verbose);
    let mut records = Vec::with_capacity(images.len());

    for image in images {
        bar.set_message(image.file_name.clone());
        let detections = detector.detect(&image.path).await?;
        let result = evaluate_detections(&detections, &options.standard, options.mode, options.min_confidence);
        log::debug!(
            "{}: {}粒検出 → {}",
            image.file_name,
            detections.len(),
            result.verdict
        );
        records.push(build_record(image, options, result));
        bar.inc(1);
    }

    bar.finish_and_clear();
    Ok(records)
}

/// 保存失敗は監査結果を捨てずに警告のみ
fn save_cache(cache: &CacheFile, cache_dir: &Path) {
    if let Err(e) = cache.save(cache_dir) {
        log::warn!("キャッシュを保存できません ({}): {}", cache_dir.display(), e);
    }
}

/// キャッシュを使用して監査
///
/// - キャッシュにある画像は検出をスキップ
/// - 新たに検出した結果をキャッシュに追記して保存（途中で検出に失敗しても保存してから返す）
pub async fn audit_images_with_cache(
    images: &[ImageInfo],
    cache_dir: &Path,
    detector: &Detector,
    options: &AuditOptions,
    verbose: bool,
) -> Result<Vec<AuditRecord>> {
    let Some(model) = detector.cache_key() else {
        return audit_images(images, detector, options, verbose).await;
    };

    let mut cache = CacheFile::load_for_model(cache_dir, &model);
    let bar = progress_bar(images.len(), verbose);
    let mut records = Vec::with_capacity(images.len());
    let mut hits = 0;

    for image in images {
        bar.set_message(image.file_name.clone());

        let hashed = compute_file_hash(&image.path)
            .map_err(|e| log::warn!("ハッシュ計算失敗 {}: {}", image.file_name, e))
            .ok();

        let cached = hashed
            .as_ref()
            .and_then(|(hash, _)| cache.get(hash))
            .map(|d| d.to_vec());

        let detections = match cached {
            Some(detections) => {
                hits += 1;
                detections
            }
            None => {
                let detections = match detector.detect(&image.path).await {
                    Ok(detections) => detections,
                    Err(e) => {
                        bar.finish_and_clear();
                        save_cache(&cache, cache_dir);
                        return Err(e);
                    }
                };
                if let Some((hash, size)) = hashed {
                    cache.insert(hash, image.file_name.clone(), size, detections.clone());
                }
                detections
            }
        };

        let result = evaluate_detections(&detections, &options.standard, options.mode, options.min_confidence);
        records.push(build_record(image, options, result));
        bar.inc(1);
    }

    bar.finish_and_clear();
    log::info!("キャッシュヒット: {}/{}", hits, images.len());
    save_cache(&cache, cache_dir);

    Ok(records)
}

pub fn summarize(records: &[AuditRecord]) -> AuditSummary {
    let purities: Vec<f64> = records
        .iter()
        .filter_map(|r| r.result.purity_percent)
        .collect();

    let mean_purity = if purities.is_empty() {
        None
    } else {
        Some(purities.iter().sum::<f64>() / purities.len() as f64)
    };

    AuditSummary {
        audited: records.len(),
        rejected: records.iter().filter(|r| r.result.is_rejected()).count(),
        approved: records.iter().filter(|r| r.result.verdict.is_approved()).count(),
        mean_purity,
    }
}
