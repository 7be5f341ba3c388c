//! 色の表現（#rrggbb）

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 小文字の `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rrggbb` / `rrggbb` / `#rgb` を受け付ける
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(Error::Color(value.to_string()));
        }
        let expanded = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(Error::Color(value.to_string())),
        };
        // from_str_radix は先頭の '+' を許すため事前に弾く
        if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Color(value.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| Error::Color(value.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// 色文字列を `#rrggbb` に正規化
pub fn normalize_hex(value: &str) -> Result<String> {
    Rgb::from_hex(value).map(|c| c.to_hex())
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
