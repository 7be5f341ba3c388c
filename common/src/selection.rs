//! 選択モデル
//!
//! 領域リストへのインデックス集合。挿入順は表示用に保持するだけで意味は持たない。
//! 選択操作はネットワーク呼び出しも履歴記録も行わない。

use crate::types::{FashionItem, ItemPatch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未選択なら追加、選択済みなら解除
    pub fn toggle(&mut self, index: usize) {
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            self.indices.remove(pos);
        } else {
            self.indices.push(index);
        }
    }

    /// `0..len` をすべて選択
    pub fn select_all(&mut self, len: usize) {
        self.indices = (0..len).collect();
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// 挿入順のインデックス
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// 昇順のインデックス
    pub fn sorted(&self) -> Vec<usize> {
        let mut sorted = self.indices.clone();
        sorted.sort_unstable();
        sorted
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `len` 以上のインデックスを取り除く
    pub fn retain_valid(&mut self, len: usize) {
        self.indices.retain(|&i| i < len);
    }

    /// 選択中の各領域にインデックス順でパッチを適用
    pub fn apply_to_selected(&self, items: &mut [FashionItem], patch: &ItemPatch) {
        for index in self.sorted() {
            if let Some(item) = items.get_mut(index) {
                patch.apply_to(item);
            }
        }
    }
}
