//! Garment Recolor
//!
//! 衣服写真の領域検出・再着色を行うCLI。
//! 状態管理とプロンプトは `garment_recolor_common`、
//! ネットワーク・画像・ファイル処理はこのクレートが担当する。

pub mod ai_provider;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gemini;
pub mod sampler;
pub mod session;
