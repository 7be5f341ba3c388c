//! 編集セッション
//!
//! `EditorState` とビューポートを保持し、2つの待機点（検出・再着色）を実行する。
//! 処理中の再入はデータ層で拒否する（`AppError::Busy`）。
//! 失敗はバナー用のエラーとして状態に残り、呼び出し元へは返さない。

use crate::ai_provider::FashionAi;
use crate::error::{AppError, Result};
use crate::sampler::ColorSampler;
use garment_recolor_common::overlay::{hit_test, to_box_space};
use garment_recolor_common::viewport::{drag_allowed, Point, PointerButton};
use garment_recolor_common::{
    Action, EditorState, FashionItem, GlobalPatch, ItemPatch, Rgb, Size, Viewport, WorkingImage,
};

pub struct Editor<A: FashionAi> {
    ai: A,
    state: EditorState,
    viewport: Viewport,
}

impl<A: FashionAi> Editor<A> {
    pub fn new(ai: A) -> Self {
        Self {
            ai,
            state: EditorState::new(),
            viewport: Viewport::new(),
        }
    }

    pub fn ai(&self) -> &A {
        &self.ai
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = state.reduce(action);
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state.is_busy() {
            log::warn!("request rejected: {:?} in flight", self.state.status());
            return Err(AppError::Busy);
        }
        Ok(())
    }

    /// 画像を読み込んで検出を実行
    ///
    /// 検出失敗は `Ok(())` のまま状態のエラーに反映される。
    pub async fn upload(&mut self, image: WorkingImage) -> Result<()> {
        self.ensure_idle()?;
        self.dispatch(Action::ImageLoaded(image.clone()));

        log::info!("detecting regions...");
        match self.ai.detect(&image).await {
            Ok(items) => {
                log::info!("detected {} regions", items.len());
                self.dispatch(Action::DetectionSucceeded(items));
            }
            Err(e) => self.dispatch(Action::DetectionFailed(e.to_string())),
        }
        Ok(())
    }

    /// 保存済みの領域リストで状態を復元（検出呼び出しなし）
    pub fn load_regions(&mut self, image: WorkingImage, items: Vec<FashionItem>) -> Result<()> {
        self.ensure_idle()?;
        self.dispatch(Action::ImageLoaded(image));
        self.dispatch(Action::DetectionSucceeded(items));
        Ok(())
    }

    /// 選択領域を再着色
    ///
    /// 画像または選択がなければ何もせず `Ok(false)`。
    pub async fn apply_recolor(&mut self) -> Result<bool> {
        self.ensure_idle()?;
        if !self.state.can_recolor() {
            return Ok(false);
        }
        let Some(image) = self.state.image().cloned() else {
            return Ok(false);
        };
        let selected: Vec<FashionItem> = self.state.selected_items().into_iter().cloned().collect();

        self.dispatch(Action::RecolorStarted);
        log::info!("recoloring {} regions...", selected.len());
        match self.ai.recolor(&image, &selected).await {
            Ok(result) => self.dispatch(Action::RecolorSucceeded(result)),
            Err(e) => self.dispatch(Action::RecolorFailed(e.to_string())),
        }
        Ok(true)
    }

    pub fn toggle_select(&mut self, index: usize) {
        self.dispatch(Action::ToggleSelect(index));
    }

    pub fn select_all(&mut self) {
        self.dispatch(Action::SelectAll);
    }

    pub fn deselect_all(&mut self) {
        self.dispatch(Action::DeselectAll);
    }

    /// インデックス列で選択を置き換える（範囲外はエラー、重複は無視）
    pub fn select_indices(&mut self, indices: &[usize]) -> Result<()> {
        let len = self.state.items().len();
        if let Some(bad) = indices.iter().find(|&&i| i >= len) {
            return Err(AppError::InvalidSelection(format!(
                "インデックス {} は範囲外です（領域数: {}）",
                bad, len
            )));
        }

        self.deselect_all();
        for &index in indices {
            if !self.state.selection().contains(index) {
                self.toggle_select(index);
            }
        }
        Ok(())
    }

    /// 選択中のdetail領域を最初のmain領域に揃え、揃えた数を返す
    pub fn sync_selected_details(&mut self) -> usize {
        let targets: Vec<usize> = self
            .state
            .detail_items()
            .into_iter()
            .map(|(index, _)| index)
            .filter(|&index| self.state.selection().contains(index))
            .collect();

        if self.state.main_items().is_empty() {
            return 0;
        }
        for &index in &targets {
            self.sync_detail_with_main(index);
        }
        targets.len()
    }

    pub fn update_item(&mut self, index: usize, patch: ItemPatch) {
        self.dispatch(Action::UpdateItem { index, patch });
    }

    pub fn update_selected(&mut self, patch: ItemPatch) {
        self.dispatch(Action::UpdateSelected(patch));
    }

    pub fn sync_detail_with_main(&mut self, index: usize) {
        self.dispatch(Action::SyncDetailWithMain(index));
    }

    pub fn update_global_settings(&mut self, patch: GlobalPatch) {
        self.dispatch(Action::UpdateGlobalSettings(patch));
    }

    pub fn toggle_masks(&mut self) {
        self.dispatch(Action::ToggleMasks);
    }

    pub fn undo(&mut self) {
        self.dispatch(Action::Undo);
    }

    pub fn redo(&mut self) {
        self.dispatch(Action::Redo);
    }

    pub fn dismiss_error(&mut self) {
        self.dispatch(Action::DismissError);
    }

    /// 表示画像上の相対位置（0〜1）でクリック。ヒットした領域の選択を切り替える
    pub fn click(&mut self, fraction_x: f64, fraction_y: f64) -> Option<usize> {
        let (x, y) = to_box_space(fraction_x, fraction_y);
        let hit = hit_test(
            self.state.items(),
            self.state.selection(),
            x,
            y,
            self.state.show_masks(),
        )?;
        self.toggle_select(hit);
        Some(hit)
    }

    /// 参照画像から色を拾い、選択中の全領域に適用
    pub fn pick_color<S: ColorSampler>(
        &mut self,
        sampler: &S,
        reference: &[u8],
        x: f64,
        y: f64,
    ) -> Result<Rgb> {
        let color = sampler.sample(reference, x, y)?;
        self.update_selected(ItemPatch::color(color.to_hex()));
        Ok(color)
    }

    /// ポインタ押下。パン可能な操作ならドラッグを開始して `true`
    ///
    /// マスク表示中の左クリックは領域選択に使うためパンしない。
    pub fn pointer_down(&mut self, button: PointerButton, alt: bool, pointer: Point) -> bool {
        if !drag_allowed(button, alt, self.state.show_masks()) {
            return false;
        }
        self.viewport.begin_drag(pointer);
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        self.viewport.drag_to(pointer);
    }

    pub fn pointer_up(&mut self) {
        self.viewport.end_drag();
    }

    /// 画像寸法とコンテナ寸法からフィット表示に戻す
    pub fn reset_view(&mut self, natural: Size, container: Size) {
        self.viewport.reset(natural, container);
    }
}
