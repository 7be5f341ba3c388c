//! プロンプト生成モジュール
//!
//! - build_detection_prompt: 領域検出用プロンプト
//! - detection_response_schema: 検出レスポンスのJSONスキーマ
//! - build_recolor_prompt: 再着色用プロンプト（選択領域ごとの指示を列挙）

use crate::types::{BoundingBox, FashionItem, ItemCategory, Pattern};
use serde_json::{json, Value};

/// 衣服本体の例（category: main）
pub const MAIN_GARMENTS: &[&str] = &[
    "Áo sơ mi", "Áo thun", "Hoodie", "Blazer", "Quần", "Váy", "Giày", "Túi",
];

/// 構造パーツの例（category: detail）
pub const CONSTRUCTION_DETAILS: &[&str] = &[
    "Bo cổ (Collar/Ribbed Neckline)",
    "Bo tay áo (Cuffs/Ribbed Cuffs)",
    "Bo gấu áo/lưng quần (Waistband/Hem)",
    "Túi (Pockets/Welt Pockets)",
    "Cầu vai (Epaulettes), Nẹp áo (Placket), Viền tay áo",
];

/// 領域検出プロンプト
pub fn build_detection_prompt() -> String {
    let garments = MAIN_GARMENTS.join(", ");
    let details = CONSTRUCTION_DETAILS
        .iter()
        .map(|d| format!("   - {}", d))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"VAI TRÒ: Chuyên gia phân tích cấu trúc thời trang (Garment Construction Expert).
NHIỆM VỤ: Xác định chính xác các thành phần trang phục chính và các chi tiết cấu tạo.

1. DANH MỤC CHÍNH (category: 'main'):
   - {garments}.

2. CHI TIẾT CẤU TẠO (category: 'detail'):
{details}

YÊU CẦU:
- Phân tích cực kỳ chi tiết các vùng có chất liệu hoặc đường may tách biệt.
- Cung cấp nhãn TIẾNG VIỆT chuẩn ngành may.
- Tọa độ box theo thứ tự [ymin, xmin, ymax, xmax], chuẩn hóa 0-1000.
- Trả về mảng JSON."#
    )
}

/// 検出レスポンスのスキーマ（generationConfig.responseSchema）
pub fn detection_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "category": { "type": "STRING", "enum": ["main", "detail"] },
                "confidence": { "type": "NUMBER" },
                "box": {
                    "type": "ARRAY",
                    "items": { "type": "NUMBER" },
                    "description": "[ymin, xmin, ymax, xmax]"
                }
            },
            "required": ["name", "category", "confidence", "box"]
        }
    })
}

/// 再着色サービスへ送る1領域分の指示
#[derive(Debug, Clone, PartialEq)]
pub struct RecolorDirective {
    pub category: ItemCategory,
    pub name: String,
    pub bbox: BoundingBox,
    pub color: String,
    pub pattern: Pattern,
}

impl RecolorDirective {
    pub fn from_item(item: &FashionItem) -> Self {
        Self {
            category: item.category,
            name: item.name.clone(),
            bbox: item.bbox,
            color: item.color.clone(),
            pattern: item.pattern,
        }
    }

    fn pattern_text(&self) -> String {
        match self.pattern {
            Pattern::Ribbed => "VẢI BO GÂN (Ribbed)".to_string(),
            other => other.id().to_string(),
        }
    }

    /// プロンプト内の1項目
    pub fn describe(&self) -> String {
        format!(
            "- [{}] {}\n  - Vùng: [ymin:{}, xmin:{}, ymax:{}, xmax:{}]\n  - Màu vải nền mới: {}\n  - Họa tiết nền: {}",
            self.category.as_str().to_uppercase(),
            self.name,
            self.bbox.ymin,
            self.bbox.xmin,
            self.bbox.ymax,
            self.bbox.xmax,
            self.color,
            self.pattern_text()
        )
    }
}

/// 再着色プロンプト
///
/// ロゴ・プリント・刺繍を保護し、ベース生地のみを染め替える指示。
pub fn build_recolor_prompt(directives: &[RecolorDirective]) -> String {
    let items = directives
        .iter()
        .map(RecolorDirective::describe)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"VAI TRÒ: Nghệ sĩ Retouch chuyên nghiệp cho thương hiệu thời trang cao cấp.
NHIỆM VỤ: Đổi màu vải nền nhưng BẢO VỆ TUYỆT ĐỐI các chi tiết đồ họa trên bề mặt:
{items}

QUY TẮC BẢO TỒN CHI TIẾT (LAYER PROTECTION RULES):
1. LAYER TÁCH BIỆT: Hãy coi LOGO, HÌNH IN, CHỮ VIẾT, và HỌA TIẾT THÊU là một lớp (layer) nằm TRÊN vải. Bạn KHÔNG ĐƯỢC phép thay đổi màu sắc, độ bão hòa hay độ sắc nét của lớp này.
2. CHỈ NHUỘM VẢI NỀN: Chỉ thay đổi màu sắc của phần diện tích vải "trống" (base fabric). Màu mới phải len lỏi dưới các sợi chỉ thêu hoặc bao quanh các hình in một cách tự nhiên.
3. GIỮ NGUYÊN PHỤ KIỆN: Tuyệt đối không làm biến đổi màu sắc của: Cúc áo, khóa kéo, đinh tán, dây thắt, và các nhãn hiệu may rời.
4. XỬ LÝ ĐỔ BÓNG: Giữ lại toàn bộ bóng đổ (shadows) và vùng bắt sáng (highlights) gốc trên vải để đảm bảo khối 3D của trang phục không bị bẹt.
5. KHÔNG LÀM MỜ: Kết quả đầu ra phải sắc nét như ảnh gốc. Không được áp dụng hiệu ứng làm mờ (blur) ở các vùng biên giới giữa hình in và vải nền.

LƯU Ý QUAN TRỌNG: Nếu một hình in có màu trắng, nó phải giữ nguyên màu trắng, không được bị ám màu theo màu vải mới.

Trả về DUY NHẤT dữ liệu hình ảnh (inlineData)."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FashionItem, RawDetection};

    fn item(pattern: Pattern) -> FashionItem {
        let mut item = FashionItem::from_detection(
            RawDetection {
                name: "Bo cổ".into(),
                category: ItemCategory::Detail,
                confidence: 0.8,
                bbox: [90.0, 200.0, 140.0, 400.0],
            },
            "item-0-1".into(),
        );
        item.color = "#112233".into();
        item.pattern = pattern;
        item
    }

    #[test]
    fn test_detection_prompt_mentions_categories() {
        let prompt = build_detection_prompt();
        assert!(prompt.contains("category: 'main'"));
        assert!(prompt.contains("category: 'detail'"));
        assert!(prompt.contains("Áo thun"));
        assert!(prompt.contains("Bo cổ"));
    }

    #[test]
    fn test_detection_schema_requires_box() {
        let schema = detection_response_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "box"));
        assert_eq!(schema["items"]["properties"]["category"]["enum"][1], "detail");
    }

    #[test]
    fn test_directive_describe() {
        let text = RecolorDirective::from_item(&item(Pattern::Stripes)).describe();
        assert!(text.starts_with("- [DETAIL] Bo cổ"));
        assert!(text.contains("[ymin:90, xmin:200, ymax:140, xmax:400]"));
        assert!(text.contains("Màu vải nền mới: #112233"));
        assert!(text.contains("Họa tiết nền: stripes"));
    }

    #[test]
    fn test_directive_ribbed_label() {
        let text = RecolorDirective::from_item(&item(Pattern::Ribbed)).describe();
        assert!(text.contains("VẢI BO GÂN (Ribbed)"));
    }

    #[test]
    fn test_recolor_prompt_lists_every_directive() {
        let directives = vec![
            RecolorDirective::from_item(&item(Pattern::None)),
            RecolorDirective::from_item(&item(Pattern::Dots)),
        ];
        let prompt = build_recolor_prompt(&directives);
        assert_eq!(prompt.matches("- [DETAIL] Bo cổ").count(), 2);
        assert!(prompt.contains("inlineData"));
    }
}
