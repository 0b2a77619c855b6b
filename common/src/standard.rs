//! 品種基準モジュール
//!
//! 品種名 → 対象ラベル集合の対応表。プリセット表または手動の粒形指定から
//! `Standard` を得る。

use crate::error::{Error, Result};
use crate::purity::normalize_label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 照合基準
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub name: String,
    /// 対象として数えるラベル
    pub targets: BTreeSet<String>,
    /// 混入物ラベル（表示用。判定には targets のみを使う）
    #[serde(default)]
    pub adulterants: BTreeSet<String>,
}

impl Standard {
    pub fn new(name: impl Into<String>, targets: &[&str], adulterants: &[&str]) -> Self {
        Self {
            name: name.into(),
            targets: targets.iter().map(|s| s.to_string()).collect(),
            adulterants: adulterants.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_target(&self, label: &str) -> bool {
        self.targets.contains(label)
    }

    /// "Expecting [premium]" 形式のキャプション
    pub fn describe(&self) -> String {
        let targets: Vec<&str> = self.targets.iter().map(String::as_str).collect();
        format!("Expecting [{}]", targets.join(", "))
    }
}

/// 手動定義モードの粒形
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainShape {
    Long,
    Medium,
    ShortRound,
}

impl GrainShape {
    pub const ALL: [GrainShape; 3] = [GrainShape::Long, GrainShape::Medium, GrainShape::ShortRound];

    pub fn label(&self) -> &'static str {
        match self {
            GrainShape::Long => "Long Grain",
            GrainShape::Medium => "Medium Grain",
            GrainShape::ShortRound => "Short/Round Grain",
        }
    }

    /// 粒形から基準を生成
    pub fn standard(&self) -> Standard {
        match self {
            GrainShape::Long => Standard::new("Custom Variety", &["premium"], &["mid", "low"]),
            GrainShape::Medium => Standard::new("Custom Variety", &["mid", "medium"], &["low"]),
            GrainShape::ShortRound => Standard::new("Custom Variety", &["low"], &[]),
        }
    }
}

impl std::str::FromStr for GrainShape {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" | "long-grain" | "l" => Ok(GrainShape::Long),
            "medium" | "medium-grain" | "mid" | "m" => Ok(GrainShape::Medium),
            "short" | "round" | "short-round" | "s" => Ok(GrainShape::ShortRound),
            _ => Err(format!("Unknown grain shape: {}. Use long, medium, or short", s)),
        }
    }
}

impl fmt::Display for GrainShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 品種表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarietyEntry {
    pub name: String,
    /// 部分一致で使うキーワード（小文字）
    #[serde(default)]
    pub keywords: Vec<String>,
    pub targets: Vec<String>,
    #[serde(default)]
    pub adulterants: Vec<String>,
}

impl VarietyEntry {
    fn preset(name: &str, keywords: &[&str], targets: &[&str], adulterants: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            targets: targets.iter().map(|s| s.to_string()).collect(),
            adulterants: adulterants.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn standard(&self) -> Standard {
        Standard {
            name: self.name.clone(),
            targets: self.targets.iter().cloned().collect(),
            adulterants: self.adulterants.iter().cloned().collect(),
        }
    }
}

/// 評価時と同じ正規化（"medium" → "mid"）を掛けて重複を除く
fn normalize_labels(labels: &mut Vec<String>) {
    let mut seen = BTreeSet::new();
    labels.retain_mut(|label| {
        *label = normalize_label(label).to_string();
        seen.insert(label.clone())
    });
}

/// 不変の品種表
///
/// 呼び出し側で生成して評価処理に渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarietyTable {
    entries: Vec<VarietyEntry>,
}

impl Default for VarietyTable {
    fn default() -> Self {
        Self::presets()
    }
}

impl VarietyTable {
    /// 組み込みプリセット
    pub fn presets() -> Self {
        Self {
            entries: vec![
                VarietyEntry::preset("Basmati (Premium)", &["basmati"], &["premium"], &["mid", "low"]),
                VarietyEntry::preset("Jasmine Rice", &["jasmine"], &["premium"], &["mid", "low"]),
                VarietyEntry::preset("Sona Masoori", &["sona"], &["mid", "medium"], &["low"]),
                VarietyEntry::preset("Ponni Rice", &["ponni"], &["mid", "medium"], &["low"]),
                VarietyEntry::preset("Matta / Parboiled", &["matta", "parboiled"], &["mid", "medium"], &["low"]),
                VarietyEntry::preset("Idli / Dosa Rice", &["idli", "dosa"], &["low", "mid"], &[]),
            ],
        }
    }

    /// JSONファイルから読み込み（プリセットを置き換える）
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let mut entries: Vec<VarietyEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(Error::Config("品種表が空です".into()));
        }
        if let Some(entry) = entries.iter().find(|e| e.targets.is_empty()) {
            return Err(Error::Config(format!("対象ラベルがありません: {}", entry.name)));
        }
        for entry in &mut entries {
            normalize_labels(&mut entry.targets);
            normalize_labels(&mut entry.adulterants);
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[VarietyEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// 品種名から基準を引く（完全一致 → キーワード部分一致）
    pub fn lookup(&self, name: &str) -> Result<Standard> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return Err(Error::UnknownVariety(name.to_string()));
        }

        if let Some(entry) = self.entries.iter().find(|e| e.name.to_lowercase() == query) {
            return Ok(entry.standard());
        }

        self.entries
            .iter()
            .find(|e| e.keywords.iter().any(|k| query.contains(k.as_str())))
            .map(VarietyEntry::standard)
            .ok_or_else(|| Error::UnknownVariety(name.to_string()))
    }
}
