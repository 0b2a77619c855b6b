//! 検出結果キャッシュモジュール
//!
//! 画像のSHA-256ハッシュをキーにして検出結果をキャッシュし、
//! 同じ画像の再検出をスキップする。モデルまたは信頼度が変わった場合は破棄する。

use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use verigrain_common::Detection;

const CACHE_FILE_NAME: &str = ".verigrain-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 検出条件（モデルパスと `--conf` の値）
    #[serde(default)]
    model: String,
    /// ファイルハッシュ → 検出結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    /// 検出器が `--conf` で足切りした結果（評価時の閾値判定は別途行う）
    pub detections: Vec<Detection>,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れていれば空）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                log::warn!("キャッシュバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                log::warn!("キャッシュを読み込めません ({}): {}", cache_path.display(), e);
                Self::default()
            }
        }
    }

    /// 指定モデルのキャッシュを読み込み
    pub fn load_for_model(folder: &Path, model: &str) -> Self {
        let cache = Self::load(folder);
        if cache.model == model {
            return cache;
        }
        if !cache.is_empty() {
            log::info!("検出条件が変更されたためキャッシュを破棄: {} → {}", cache.model, model);
        }
        Self {
            model: model.to_string(),
            ..Self::default()
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&[Detection]> {
        self.entries.get(hash).map(|e| e.detections.as_slice())
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, detections: Vec<Detection>) {
        self.entries.insert(hash, CacheEntry {
            file_name,
            file_size,
            detections,
        });
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            model: String::new(),
            entries: HashMap::new(),
        }
    }
}

/// 画像ファイルのハッシュ（SHA-256, hex）とサイズ
pub fn compute_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let size = std::io::copy(&mut file, &mut hasher)?;
    Ok((hex::encode(hasher.finalize()), size))
}
