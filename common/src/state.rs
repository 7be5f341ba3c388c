//! エディタ状態コンテナ
//!
//! 画像・領域・選択・履歴・フィルタを1つの値にまとめ、
//! `EditorState::reduce` による純粋な遷移でのみ更新する。
//! ネットワーク呼び出しは行わない（呼び出し側が結果をActionとして渡す）。

use crate::filters::{GlobalPatch, GlobalSettings};
use crate::history::History;
use crate::image_data::WorkingImage;
use crate::selection::Selection;
use crate::types::{FashionItem, ItemCategory, ItemPatch};

/// 検出失敗時のバナー文言
pub const DETECTION_FAILED_MESSAGE: &str = "Không thể phân tích hình ảnh. Vui lòng thử lại.";
/// 再着色失敗時のバナー文言
pub const RECOLOR_FAILED_MESSAGE: &str = "Đổi màu bằng AI thất bại.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessStatus {
    #[default]
    Idle,
    Detecting,
    Recoloring,
    Error,
}

/// 状態遷移
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// 新しい画像を読み込んだ（検出開始）
    ImageLoaded(WorkingImage),
    DetectionSucceeded(Vec<FashionItem>),
    /// 診断用の詳細。バナーには固定文言を出す
    DetectionFailed(String),
    ToggleSelect(usize),
    SelectAll,
    DeselectAll,
    UpdateItem { index: usize, patch: ItemPatch },
    UpdateSelected(ItemPatch),
    /// 最初のmain領域の色・パターン・調整値を指定領域へコピー
    SyncDetailWithMain(usize),
    UpdateGlobalSettings(GlobalPatch),
    ToggleMasks,
    RecolorStarted,
    RecolorSucceeded(WorkingImage),
    /// 診断用の詳細。バナーには固定文言を出す
    RecolorFailed(String),
    Undo,
    Redo,
    DismissError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    image: Option<WorkingImage>,
    items: Vec<FashionItem>,
    selection: Selection,
    history: History<Vec<FashionItem>>,
    show_masks: bool,
    global_settings: GlobalSettings,
    status: ProcessStatus,
    error: Option<String>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            image: None,
            items: Vec::new(),
            selection: Selection::new(),
            history: History::new(),
            show_masks: true,
            global_settings: GlobalSettings::default(),
            status: ProcessStatus::Idle,
            error: None,
        }
    }
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 前の状態とActionから次の状態を返す
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::ImageLoaded(image) => {
                self.image = Some(image);
                self.items.clear();
                self.selection.clear();
                self.history.clear();
                self.global_settings = GlobalSettings::default();
                self.status = ProcessStatus::Detecting;
                self.error = None;
            }

            Action::DetectionSucceeded(items) => {
                if self.status != ProcessStatus::Detecting {
                    log::warn!("detection result ignored: status is {:?}", self.status);
                    return self;
                }
                self.items = items;
                self.history.record(&self.items);
                self.status = ProcessStatus::Idle;
            }

            Action::DetectionFailed(detail) => {
                if self.status != ProcessStatus::Detecting {
                    log::warn!("detection failure ignored: status is {:?}", self.status);
                    return self;
                }
                log::warn!("detection failed: {}", detail);
                self.error = Some(DETECTION_FAILED_MESSAGE.to_string());
                self.status = ProcessStatus::Error;
            }

            Action::ToggleSelect(index) => {
                if index < self.items.len() {
                    self.selection.toggle(index);
                }
            }

            Action::SelectAll => self.selection.select_all(self.items.len()),

            Action::DeselectAll => self.selection.clear(),

            Action::UpdateItem { index, patch } => {
                if let Some(item) = self.items.get_mut(index) {
                    patch.apply_to(item);
                }
            }

            Action::UpdateSelected(patch) => {
                self.selection.apply_to_selected(&mut self.items, &patch);
            }

            Action::SyncDetailWithMain(index) => {
                let source = self
                    .items
                    .iter()
                    .find(|i| i.category == ItemCategory::Main)
                    .map(|main| ItemPatch {
                        color: Some(main.color.clone()),
                        pattern: Some(main.pattern),
                        settings: Some(main.settings),
                        ..Default::default()
                    });
                if let (Some(patch), Some(item)) = (source, self.items.get_mut(index)) {
                    patch.apply_to(item);
                }
            }

            Action::UpdateGlobalSettings(patch) => self.global_settings.apply(&patch),

            Action::ToggleMasks => self.show_masks = !self.show_masks,

            Action::RecolorStarted => {
                if !self.can_recolor() {
                    log::debug!("recolor not started: nothing selected or busy");
                    return self;
                }
                self.status = ProcessStatus::Recoloring;
                self.error = None;
            }

            Action::RecolorSucceeded(image) => {
                if self.status != ProcessStatus::Recoloring {
                    log::warn!("recolor result ignored: status is {:?}", self.status);
                    return self;
                }
                self.image = Some(image);
                self.history.record(&self.items);
                self.status = ProcessStatus::Idle;
            }

            Action::RecolorFailed(detail) => {
                if self.status != ProcessStatus::Recoloring {
                    log::warn!("recolor failure ignored: status is {:?}", self.status);
                    return self;
                }
                log::warn!("recolor failed: {}", detail);
                self.error = Some(RECOLOR_FAILED_MESSAGE.to_string());
                self.status = ProcessStatus::Idle;
            }

            Action::Undo => {
                if let Some(entry) = self.history.undo() {
                    self.items = entry.clone();
                    self.selection.retain_valid(self.items.len());
                }
            }

            Action::Redo => {
                if let Some(entry) = self.history.redo() {
                    self.items = entry.clone();
                    self.selection.retain_valid(self.items.len());
                }
            }

            Action::DismissError => self.error = None,
        }
        self
    }

    pub fn image(&self) -> Option<&WorkingImage> {
        self.image.as_ref()
    }

    pub fn items(&self) -> &[FashionItem] {
        &self.items
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History<Vec<FashionItem>> {
        &self.history
    }

    pub fn show_masks(&self) -> bool {
        self.show_masks
    }

    pub fn global_settings(&self) -> &GlobalSettings {
        &self.global_settings
    }

    pub fn status(&self) -> ProcessStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, ProcessStatus::Detecting | ProcessStatus::Recoloring)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// 画像があり、選択があり、処理中でない
    pub fn can_recolor(&self) -> bool {
        self.image.is_some() && !self.selection.is_empty() && !self.is_busy()
    }

    pub fn is_all_selected(&self) -> bool {
        !self.items.is_empty() && self.selection.len() == self.items.len()
    }

    /// 選択順の領域
    pub fn selected_items(&self) -> Vec<&FashionItem> {
        self.selection
            .indices()
            .iter()
            .filter_map(|&i| self.items.get(i))
            .collect()
    }

    pub fn main_items(&self) -> Vec<(usize, &FashionItem)> {
        self.items_in(ItemCategory::Main)
    }

    pub fn detail_items(&self) -> Vec<(usize, &FashionItem)> {
        self.items_in(ItemCategory::Detail)
    }

    fn items_in(&self, category: ItemCategory) -> Vec<(usize, &FashionItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.category == category)
            .collect()
    }
}
