//! 領域（FashionItem）の型定義
//!
//! CLIと各フロントエンドで共有される型:
//! - RawDetection: 検出サービスの生レスポンス1件
//! - FashionItem: 編集状態を持つ検出領域
//! - ItemPatch: 領域へのフィールド単位の変更

use serde::{Deserialize, Serialize};

/// 正規化座標系の上限（0〜1000）
pub const BOX_SCALE: f64 = 1000.0;

/// 既定の塗り色
pub const DEFAULT_COLOR: &str = "#ffffff";

/// 正規化バウンディングボックス（0〜1000スケール）
///
/// `ymin <= ymax` / `xmin <= xmax` は検証しない。
/// 逆転したボックスはオーバーレイ上で負のサイズになる。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

impl BoundingBox {
    /// `[ymin, xmin, ymax, xmax]` 配列から生成
    pub fn from_array(values: [f64; 4]) -> Self {
        Self {
            ymin: values[0],
            xmin: values[1],
            ymax: values[2],
            xmax: values[3],
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// 正規化座標 (x, y) がボックス内にあるか（境界を含む）
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.xmin && x <= self.xmax && y >= self.ymin && y <= self.ymax
    }
}

/// 領域区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    /// 衣服本体（シャツ、パンツ等）
    #[default]
    Main,
    /// 構造パーツ（襟、袖口、裾、ポケット等）
    Detail,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Main => "main",
            ItemCategory::Detail => "detail",
        }
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生地パターン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    #[default]
    None,
    Ribbed,
    Stripes,
    Plaid,
    Dots,
    Floral,
}

impl Pattern {
    /// 選択肢の表示順
    pub const ALL: [Pattern; 6] = [
        Pattern::None,
        Pattern::Ribbed,
        Pattern::Stripes,
        Pattern::Plaid,
        Pattern::Dots,
        Pattern::Floral,
    ];

    /// シリアライズ時のタグ
    pub fn id(&self) -> &'static str {
        match self {
            Pattern::None => "none",
            Pattern::Ribbed => "ribbed",
            Pattern::Stripes => "stripes",
            Pattern::Plaid => "plaid",
            Pattern::Dots => "dots",
            Pattern::Floral => "floral",
        }
    }

    /// UI表示名
    pub fn label(&self) -> &'static str {
        match self {
            Pattern::None => "Trơn",
            Pattern::Ribbed => "Bo gân",
            Pattern::Stripes => "Kẻ sọc",
            Pattern::Plaid => "Caro",
            Pattern::Dots => "Chấm bi",
            Pattern::Floral => "Hoa văn",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Pattern::ALL
            .iter()
            .copied()
            .find(|p| p.id() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown pattern: {}. Use none, ribbed, stripes, plaid, dots, or floral",
                    s
                )
            })
    }
}

/// 領域ごとの調整値（%）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSettings {
    pub saturation: u32,
    pub brightness: u32,
    pub contrast: u32,
}

impl ItemSettings {
    /// スライダーの上限
    pub const MAX: u32 = 200;

    /// 範囲外の値をスライダー上限に丸める
    pub fn clamped(self) -> Self {
        Self {
            saturation: self.saturation.min(Self::MAX),
            brightness: self.brightness.min(Self::MAX),
            contrast: self.contrast.min(Self::MAX),
        }
    }
}

impl Default for ItemSettings {
    fn default() -> Self {
        Self {
            saturation: 100,
            brightness: 100,
            contrast: 100,
        }
    }
}

/// 検出サービスのレスポンス1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub name: String,
    pub category: ItemCategory,
    pub confidence: f64,
    /// `[ymin, xmin, ymax, xmax]`
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
}

/// 検出領域と編集状態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FashionItem {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub color: String,
    #[serde(default)]
    pub pattern: Pattern,
    pub category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_color: Option<String>,
    #[serde(default)]
    pub settings: ItemSettings,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl FashionItem {
    /// 検出結果から既定の編集状態を持つ領域を生成
    pub fn from_detection(raw: RawDetection, id: String) -> Self {
        Self {
            id,
            name: raw.name,
            confidence: raw.confidence,
            bbox: BoundingBox::from_array(raw.bbox),
            color: DEFAULT_COLOR.to_string(),
            pattern: Pattern::None,
            category: raw.category,
            original_color: None,
            settings: ItemSettings::default(),
            is_visible: true,
        }
    }
}

/// 検出パス1回分の領域リストを生成
///
/// IDは `item-{index}-{stamp}`。`stamp` は呼び出し側のミリ秒タイムスタンプ。
/// 順序はサービスの返却順のまま。
pub fn items_from_detections(raw: Vec<RawDetection>, stamp: i64) -> Vec<FashionItem> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| FashionItem::from_detection(r, format!("item-{}-{}", index, stamp)))
        .collect()
}

/// 領域へのフィールド単位の変更
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub pattern: Option<Pattern>,
    pub settings: Option<ItemSettings>,
    pub is_visible: Option<bool>,
}

impl ItemPatch {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }

    pub fn pattern(pattern: Pattern) -> Self {
        Self {
            pattern: Some(pattern),
            ..Default::default()
        }
    }

    pub fn settings(settings: ItemSettings) -> Self {
        Self {
            settings: Some(settings),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 指定されたフィールドだけを上書き
    pub fn apply_to(&self, item: &mut FashionItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(color) = &self.color {
            item.color = color.clone();
        }
        if let Some(pattern) = self.pattern {
            item.pattern = pattern;
        }
        if let Some(settings) = self.settings {
            item.settings = settings.clamped();
        }
        if let Some(visible) = self.is_visible {
            item.is_visible = visible;
        }
    }
}
