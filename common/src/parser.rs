//! 検出器出力パーサー
//!
//! 検出器プロセスの標準出力からJSONを抽出し、検出結果をパースする

use crate::error::{Error, Result};
use crate::types::Detection;

/// 出力からJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use verigrain_common::extract_json;
///
/// let stdout = "loading model...\n[{\"label\": \"premium\"}]";
/// let json = extract_json(stdout).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(output: &str) -> Result<&str> {
    if let Some(start_marker) = output.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = output[start..].find("```") {
            let end = start + end_offset;
            return Ok(output[start..end].trim());
        }
    }

    if let Some(array) = find_object_array(output) {
        return Ok(array);
    }

    if let Some(start) = output.find('[') {
        if let Some(end) = output.rfind(']') {
            if end >= start {
                return Ok(&output[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 先頭から `[` ごとに、オブジェクト配列として読める最初の範囲を探す
///
/// `[INFO] loading model` のようなログ行や bbox の数値配列は読み飛ばす。
fn find_object_array(output: &str) -> Option<&str> {
    output.match_indices('[').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&output[start..])
            .into_iter::<Vec<serde_json::Map<String, serde_json::Value>>>();
        match stream.next() {
            Some(Ok(_)) => Some(&output[start..start + stream.byte_offset()]),
            _ => None,
        }
    })
}

/// 検出結果をパース
pub fn parse_detections(output: &str) -> Result<Vec<Detection>> {
    let json_str = extract_json(output)?;
    let detections: Vec<Detection> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("検出結果JSONパースエラー: {}", e)))?;
    Ok(detections)
}
