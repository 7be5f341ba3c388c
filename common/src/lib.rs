//! Garment Recolor Common Library
//!
//! CLIと各フロントエンドで共有される型・状態管理・プロンプト

pub mod color;
pub mod error;
pub mod filters;
pub mod history;
pub mod image_data;
pub mod overlay;
pub mod parser;
pub mod prompts;
pub mod selection;
pub mod state;
pub mod types;
pub mod viewport;

pub use color::{normalize_hex, Rgb};
pub use error::{Error, Result};
pub use filters::{GlobalPatch, GlobalSettings};
pub use history::History;
pub use image_data::WorkingImage;
pub use overlay::{hit_test, overlay_rect, PercentRect};
pub use parser::{extract_json, parse_detection_response};
pub use prompts::{build_detection_prompt, build_recolor_prompt, detection_response_schema, RecolorDirective};
pub use selection::Selection;
pub use state::{Action, EditorState, ProcessStatus, DETECTION_FAILED_MESSAGE, RECOLOR_FAILED_MESSAGE};
pub use types::{
    items_from_detections, BoundingBox, FashionItem, ItemCategory, ItemPatch, ItemSettings, Pattern,
    RawDetection,
};
pub use viewport::{Point, Size, Viewport};
