//! 画像全体の表示フィルタ
//!
//! 表示時の変換のみ。画像データには書き戻さない。

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const BRIGHTNESS_RANGE: RangeInclusive<u32> = 50..=150;
pub const CONTRAST_RANGE: RangeInclusive<u32> = 50..=150;
pub const SATURATION_RANGE: RangeInclusive<u32> = 0..=200;
pub const SHARPNESS_RANGE: RangeInclusive<u32> = 0..=100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub brightness: u32,
    pub contrast: u32,
    pub saturation: u32,
    pub sharpness: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 100,
            saturation: 100,
            sharpness: 0,
        }
    }
}

/// 部分更新
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalPatch {
    pub brightness: Option<u32>,
    pub contrast: Option<u32>,
    pub saturation: Option<u32>,
    pub sharpness: Option<u32>,
}

fn clamp_to(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

impl GlobalSettings {
    /// パッチを適用（各値はスライダー範囲にクランプ）
    pub fn apply(&mut self, patch: &GlobalPatch) {
        if let Some(v) = patch.brightness {
            self.brightness = clamp_to(v, &BRIGHTNESS_RANGE);
        }
        if let Some(v) = patch.contrast {
            self.contrast = clamp_to(v, &CONTRAST_RANGE);
        }
        if let Some(v) = patch.saturation {
            self.saturation = clamp_to(v, &SATURATION_RANGE);
        }
        if let Some(v) = patch.sharpness {
            self.sharpness = clamp_to(v, &SHARPNESS_RANGE);
        }
    }

    /// シャープネスをコントラストに上乗せした実効値
    pub fn effective_contrast(&self) -> f64 {
        self.contrast as f64 + self.sharpness as f64 * 0.2
    }

    /// シャープネス分だけ明るさを下げた実効値
    pub fn effective_brightness(&self) -> f64 {
        self.brightness as f64 - self.sharpness as f64 * 0.05
    }

    /// CSS filter 文字列
    pub fn css_filter(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%)",
            self.effective_brightness(),
            self.effective_contrast(),
            self.saturation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let settings = GlobalSettings::default();
        assert_eq!(settings.css_filter(), "brightness(100%) contrast(100%) saturate(100%)");
    }

    #[test]
    fn test_sharpness_shifts_contrast_and_brightness() {
        let settings = GlobalSettings {
            sharpness: 50,
            ..Default::default()
        };
        assert_eq!(settings.effective_contrast(), 110.0);
        assert_eq!(settings.effective_brightness(), 97.5);
        assert_eq!(settings.css_filter(), "brightness(97.5%) contrast(110%) saturate(100%)");
    }

    #[test]
    fn test_apply_patch_clamps() {
        let mut settings = GlobalSettings::default();
        settings.apply(&GlobalPatch {
            brightness: Some(10),
            contrast: Some(140),
            sharpness: Some(500),
            ..Default::default()
        });
        assert_eq!(settings.brightness, 50);
        assert_eq!(settings.contrast, 140);
        assert_eq!(settings.saturation, 100);
        assert_eq!(settings.sharpness, 100);
    }
}
