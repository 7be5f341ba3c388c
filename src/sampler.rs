//! 参照画像からの色抽出
//!
//! 画像バイト列と正規化座標（各軸0〜1）からRGB値を返す。
//! 描画面には依存しない。

use crate::error::{AppError, Result};
use garment_recolor_common::Rgb;

pub trait ColorSampler {
    fn sample(&self, image: &[u8], x: f64, y: f64) -> Result<Rgb>;
}

/// `image` クレートでデコードして1ピクセルを読む
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageSampler;

/// 正規化座標をピクセル位置へ（範囲外は端にクランプ）
fn to_pixel(fraction: f64, extent: u32) -> u32 {
    let max = extent.saturating_sub(1);
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    ((fraction * extent as f64).floor() as u32).min(max)
}

impl ColorSampler for ImageSampler {
    fn sample(&self, image: &[u8], x: f64, y: f64) -> Result<Rgb> {
        let decoded = image::load_from_memory(image)
            .map_err(|e| AppError::ImageLoad(e.to_string()))?
            .to_rgb8();

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::ImageLoad("画像サイズが0です".into()));
        }

        let px = to_pixel(x, width);
        let py = to_pixel(y, height);
        let pixel = decoded.get_pixel(px, py);
        log::debug!("sampled ({}, {}) of {}x{}: {:?}", px, py, width, height, pixel.0);

        Ok(Rgb::new(pixel[0], pixel[1], pixel[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_clamps() {
        assert_eq!(to_pixel(0.0, 10), 0);
        assert_eq!(to_pixel(-0.5, 10), 0);
        assert_eq!(to_pixel(0.55, 10), 5);
        assert_eq!(to_pixel(1.0, 10), 9);
        assert_eq!(to_pixel(3.0, 10), 9);
        assert_eq!(to_pixel(f64::NAN, 10), 0);
    }

    #[test]
    fn test_sample_invalid_bytes() {
        let result = ImageSampler.sample(b"not an image", 0.5, 0.5);
        assert!(matches!(result, Err(AppError::ImageLoad(_))));
    }
}
