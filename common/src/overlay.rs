//! クリック可能な領域オーバーレイの幾何計算

use crate::selection::Selection;
use crate::types::{BoundingBox, FashionItem, BOX_SCALE};

/// 表示画像に対する百分率の矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// 0〜1000スケールのボックスを百分率矩形に変換
///
/// 逆転したボックスは負の幅/高さになる（検証しない）。
pub fn overlay_rect(bbox: &BoundingBox) -> PercentRect {
    let to_percent = |v: f64| v / (BOX_SCALE / 100.0);
    PercentRect {
        top: to_percent(bbox.ymin),
        left: to_percent(bbox.xmin),
        width: to_percent(bbox.width()),
        height: to_percent(bbox.height()),
    }
}

/// 表示画像上の相対位置（0〜1）を0〜1000スケールへ
pub fn to_box_space(fraction_x: f64, fraction_y: f64) -> (f64, f64) {
    (fraction_x * BOX_SCALE, fraction_y * BOX_SCALE)
}

/// クリック位置 (x, y)（0〜1000スケール）で最前面の領域を返す
///
/// 選択中の領域は未選択より前面、同じ層では後の領域が前面。
/// マスク非表示時は何もヒットしない。
pub fn hit_test(
    items: &[FashionItem],
    selection: &Selection,
    x: f64,
    y: f64,
    show_masks: bool,
) -> Option<usize> {
    if !show_masks {
        return None;
    }

    let hit = |index: usize| {
        let item = &items[index];
        item.is_visible && item.bbox.contains(x, y)
    };

    let (selected, unselected): (Vec<usize>, Vec<usize>) =
        (0..items.len()).partition(|&i| selection.contains(i));

    selected
        .iter()
        .rev()
        .find(|&&i| hit(i))
        .or_else(|| unselected.iter().rev().find(|&&i| hit(i)))
        .copied()
}
