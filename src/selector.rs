//! 照合基準の選択
//!
//! `--variety` / `--shape` が無い場合は対話式で品種を選ぶ。

use crate::cli::StandardArgs;
use crate::error::{Result, VerigrainError};
use dialoguer::Select;
use std::io::IsTerminal;
use verigrain_common::{GrainShape, Standard, VarietyTable};

pub const DEFINE_NEW_VARIETY: &str = "➕ DEFINE NEW VARIETY";

/// 選択肢（プリセット + 新品種定義）
pub fn menu_items(table: &VarietyTable) -> Vec<String> {
    let mut items: Vec<String> = table.names().into_iter().map(String::from).collect();
    items.push(DEFINE_NEW_VARIETY.to_string());
    items
}

/// 引数から基準を決定（未指定なら対話選択）
pub fn resolve_standard(args: &StandardArgs, table: &VarietyTable) -> Result<Standard> {
    if let Some(name) = &args.variety {
        return Ok(table.lookup(name)?);
    }
    if let Some(shape) = args.shape {
        return Ok(shape.standard());
    }

    if !std::io::stdin().is_terminal() {
        return Err(VerigrainError::Config(
            "--variety または --shape を指定してください".into(),
        ));
    }

    select_standard_interactive(table)
}

fn select_standard_interactive(table: &VarietyTable) -> Result<Standard> {
    let items = menu_items(table);
    let choice = Select::new()
        .with_prompt("🍚 Calibration Standard: Select Rice Variety")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| VerigrainError::Config(e.to_string()))?;

    if let Some(entry) = table.entries().get(choice) {
        return Ok(entry.standard());
    }

    println!("Manual Calibration Mode");
    let shapes: Vec<&str> = GrainShape::ALL.iter().map(|s| s.label()).collect();
    let shape_idx = Select::new()
        .with_prompt("What shape is this rice SUPPOSED to be?")
        .items(&shapes)
        .default(0)
        .interact()
        .map_err(|e| VerigrainError::Config(e.to_string()))?;

    Ok(GrainShape::ALL[shape_idx].standard())
}
