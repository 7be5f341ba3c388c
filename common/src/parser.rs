//! APIレスポンスパーサー
//!
//! 検出サービスのテキストレスポンスからJSONを抽出し、
//! RawDetection配列としてパースする

use crate::error::{Error, Result};
use crate::types::RawDetection;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Examples
/// ```
/// use garment_recolor_common::extract_json;
///
/// let response = "[{\"key\": \"value\"}]";
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("key"));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の [...] を探す
    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 検出レスポンスをパース
///
/// 空レスポンスはエラー、空配列 `[]` は正常な0件として扱う。
/// 1件でも形式不正があれば全体をエラーにする（部分的な結果は返さない）。
pub fn parse_detection_response(response: &str) -> Result<Vec<RawDetection>> {
    if response.trim().is_empty() {
        return Err(Error::Parse("レスポンスが空です".into()));
    }

    let json_str = extract_json(response)?;
    serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("検出 JSONパースエラー: {}", e)))
}
