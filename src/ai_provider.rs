//! リモートAIサービスの抽象
//!
//! 検出と再着色をまとめた能力。本番は `GeminiClient`、テストでは偽実装を差し込む。

use crate::error::Result;
use garment_recolor_common::{FashionItem, WorkingImage};

#[allow(async_fn_in_trait)]
pub trait FashionAi {
    /// 画像から領域リストを検出（サービスの返却順、ID・既定値付き）
    async fn detect(&self, image: &WorkingImage) -> Result<Vec<FashionItem>>;

    /// 選択領域を再着色した新しい画像を返す
    async fn recolor(&self, image: &WorkingImage, items: &[FashionItem]) -> Result<WorkingImage>;
}
