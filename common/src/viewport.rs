//! 表示キャンバスのパン/ズーム状態
//!
//! 表示専用。履歴には含めず、保存もしない。

/// 内部クランプ範囲
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;
/// スライダーの上限
pub const SLIDER_MAX_SCALE: f64 = 5.0;
/// フィット時の余白係数
pub const FIT_MARGIN: f64 = 0.85;

pub const ZOOM_IN_STEP: f64 = 1.2;
pub const ZOOM_OUT_STEP: f64 = 0.8;
const WHEEL_ZOOM_IN: f64 = 1.1;
const WHEEL_ZOOM_OUT: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// 画像の実寸とコンテナ寸法からフィット倍率を計算
///
/// 画像寸法が0の場合は等倍。
pub fn fit_scale(natural: Size, container: Size) -> f64 {
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return 1.0;
    }
    (container.width / natural.width).min(container.height / natural.height) * FIT_MARGIN
}

/// ドラッグでのパンを開始してよいか
///
/// 中ボタン、Alt押下、またはマスク非表示時の左ボタン。
pub fn drag_allowed(button: PointerButton, alt: bool, show_masks: bool) -> bool {
    button == PointerButton::Middle || alt || (button == PointerButton::Primary && !show_masks)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    position: Point,
    /// ドラッグ開始時のポインタ位置 − 表示位置
    drag_anchor: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: Point::ORIGIN,
            drag_anchor: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// 倍率を掛けて [0.1, 10] にクランプ
    pub fn zoom_by(&mut self, factor: f64) {
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_IN_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(ZOOM_OUT_STEP);
    }

    /// スライダーからの直接指定（[0.1, 5]）
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, SLIDER_MAX_SCALE);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// フィット倍率と原点に戻す
    pub fn reset(&mut self, natural: Size, container: Size) {
        self.scale = fit_scale(natural, container);
        self.position = Point::ORIGIN;
        self.drag_anchor = None;
    }

    /// ホイール入力。Ctrl/Meta併用でズーム、それ以外はパン
    pub fn wheel(&mut self, delta_x: f64, delta_y: f64, zoom_modifier: bool) {
        if zoom_modifier {
            let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
            self.zoom_by(factor);
        } else {
            self.pan_by(-delta_x, -delta_y);
        }
    }

    pub fn begin_drag(&mut self, pointer: Point) {
        self.drag_anchor = Some(Point::new(pointer.x - self.position.x, pointer.y - self.position.y));
    }

    /// ドラッグ中でなければ何もしない
    pub fn drag_to(&mut self, pointer: Point) {
        if let Some(anchor) = self.drag_anchor {
            self.position = Point::new(pointer.x - anchor.x, pointer.y - anchor.y);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// スライダー表示用の百分率
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// `translate(xpx, ypx) scale(s)`
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.position.x, self.position.y, self.scale
        )
    }
}
