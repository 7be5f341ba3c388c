//! 作業画像のファイル出力（ローカルのみ、サーバー往復なし）

use crate::error::{AppError, Result};
use garment_recolor_common::WorkingImage;
use std::path::{Path, PathBuf};

/// 既定の出力ファイル名
pub fn default_export_name(timestamp_millis: i64) -> String {
    format!("thaymau-ai-{}.png", timestamp_millis)
}

fn output_path_for(output: &Path, file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(file_name)
    } else {
        output.to_path_buf()
    }
}

/// 作業画像をデコードして書き出し、書き出したパスを返す
///
/// `output` がディレクトリ（または拡張子なし）の場合は既定名で保存する。
pub fn export_image(image: &WorkingImage, output: &Path) -> Result<PathBuf> {
    let bytes = image.decode_bytes()?;
    if bytes.is_empty() {
        return Err(AppError::ImageLoad("画像データが空です".into()));
    }

    let path = output_path_for(output, &default_export_name(chrono::Utc::now().timestamp_millis()));
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&path, &bytes)?;
    log::info!("exported {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// 画像ファイルを読み込んで作業画像にする
pub fn load_image_file(path: &Path) -> Result<WorkingImage> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes).map_err(|e| AppError::ImageLoad(e.to_string()))?;
    Ok(WorkingImage::from_bytes(format.to_mime_type(), &bytes))
}
