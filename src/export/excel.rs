//! Excel台帳生成（CLI版）

use crate::error::{Result, VerigrainError};
use std::path::Path;
use verigrain_common::export::excel_core::generate_ledger_buffer;
use verigrain_common::AuditRecord;

pub fn generate_excel(records: &[AuditRecord], output_path: &Path, title: &str) -> Result<()> {
    let buffer = generate_ledger_buffer(records, title).map_err(VerigrainError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)
        .map_err(|e| VerigrainError::ExcelGeneration(format!("Excel保存エラー: {}", e)))?;
    Ok(())
}
