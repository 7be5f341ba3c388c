//! 作業画像（Data URL）
//!
//! 画像はData URL文字列として不透明に扱う。
//! 部分的な変更はせず、アップロードまたは再着色結果で丸ごと置き換える。

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、または抽出失敗時はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出（失敗時は "image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("image/jpeg")
}

/// 編集対象の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingImage {
    data_url: String,
}

impl WorkingImage {
    /// Data URL文字列から生成（形式のみ検証）
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self> {
        let data_url = data_url.into();
        if !data_url.starts_with("data:") || extract_base64_from_data_url(&data_url).is_none() {
            return Err(Error::DataUrl(truncate(&data_url)));
        }
        Ok(Self { data_url })
    }

    /// 生バイト列からData URLを組み立てる
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self::from_base64(mime_type, &STANDARD.encode(bytes))
    }

    /// Base64済みデータからData URLを組み立てる
    pub fn from_base64(mime_type: &str, base64_data: &str) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", mime_type, base64_data),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &str {
        extract_mime_type_from_data_url(&self.data_url)
    }

    /// 送信用のBase64部分（プレフィックス除去済み）
    pub fn base64_payload(&self) -> &str {
        extract_base64_from_data_url(&self.data_url).unwrap_or_default()
    }

    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.base64_payload())
            .map_err(|e| Error::DataUrl(format!("base64: {}", e)))
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(40).collect()
}
