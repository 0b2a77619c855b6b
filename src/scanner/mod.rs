mod exif;

use crate::error::{Result, VerigrainError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<String>,
}

impl ImageInfo {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let date = exif::extract_date(path)
            .map_err(|e| log::debug!("EXIF日時なし {}: {}", path.display(), e))
            .ok();

        Self {
            path: path.to_path_buf(),
            file_name,
            date,
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

fn is_image_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false)
}

/// 画像ファイル1枚、またはフォルダ内の画像を列挙
pub fn scan_path(path: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if path.is_file() {
        if !is_image_file(path) {
            return Err(VerigrainError::ImageLoad(format!(
                "対応していない形式です (jpg/jpeg/png): {}",
                path.display()
            )));
        }
        return Ok(vec![ImageInfo::from_path(path)]);
    }

    scan_folder(path, recursive)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(VerigrainError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| is_image_file(entry.path()))
        .map(|entry| ImageInfo::from_path(entry.path()))
        .collect();

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}
