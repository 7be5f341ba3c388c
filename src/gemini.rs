//! Gemini API連携
//!
//! - 検出: 画像 + 検出プロンプト、JSONスキーマ指定でテキストを受け取る
//! - 再着色: 画像 + 再着色プロンプト、インライン画像を受け取る

use crate::ai_provider::FashionAi;
use crate::config::Config;
use crate::error::{AppError, Result};
use garment_recolor_common::{
    build_detection_prompt, build_recolor_prompt, detection_response_schema,
    items_from_detections, parse_detection_response, FashionItem, RecolorDirective, WorkingImage,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 再着色結果を包むMIMEタイプ
const RESULT_MIME_TYPE: &str = "image/png";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

impl Part {
    fn image(image: &WorkingImage) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.base64_payload().to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseBlob>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlob {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    #[serde(default)]
    data: String,
}

impl GeminiResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// 先頭候補のテキストパートを連結（なければNone）
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// 先頭候補で最初に見つかったインライン画像
    ///
    /// MIMEタイプに関わらず PNG のData URLとして包み直す。
    pub fn first_inline_image(&self) -> Option<WorkingImage> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|blob| !blob.data.is_empty())
            .map(|blob| {
                log::debug!("inline image part: {} ({} chars)", blob.mime_type, blob.data.len());
                WorkingImage::from_base64(RESULT_MIME_TYPE, &blob.data)
            })
    }
}

/// 検出リクエストを組み立てる
pub fn build_detection_request(image: &WorkingImage) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: build_detection_prompt(),
                },
                Part::image(image),
            ],
        }],
        generation_config: Some(GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json".to_string(),
            response_schema: detection_response_schema(),
        }),
    }
}

/// 再着色リクエストを組み立てる（画像を先頭に置く）
pub fn build_recolor_request(image: &WorkingImage, items: &[FashionItem]) -> GeminiRequest {
    let directives: Vec<RecolorDirective> = items.iter().map(RecolorDirective::from_item).collect();

    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::image(image),
                Part::Text {
                    text: build_recolor_prompt(&directives),
                },
            ],
        }],
        generation_config: None,
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    detect_model: String,
    recolor_model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            http: builder.build()?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            detect_model: config.detect_model.clone(),
            recolor_model: config.recolor_model.clone(),
        })
    }

    /// エンドポイントの差し替え（プロキシ・テスト用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent?key={}", self.base_url, model, self.api_key)
    }

    /// Gemini API呼び出し（共通処理）
    async fn generate(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
        log::debug!("POST {}/{}:generateContent", self.base_url, model);

        let response = self
            .http
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ApiCall(format!("API error: {} {}", status, body)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppError::ApiParse(e.to_string()))
    }
}

impl FashionAi for GeminiClient {
    async fn detect(&self, image: &WorkingImage) -> Result<Vec<FashionItem>> {
        let request = build_detection_request(image);
        let response = self.generate(&self.detect_model, &request).await?;

        let text = response
            .text()
            .ok_or_else(|| AppError::ApiParse("AIからの応答がありません".into()))?;
        log::debug!("detection response: {} chars", text.len());

        let raw = parse_detection_response(&text)?;
        Ok(items_from_detections(raw, chrono::Utc::now().timestamp_millis()))
    }

    async fn recolor(&self, image: &WorkingImage, items: &[FashionItem]) -> Result<WorkingImage> {
        let request = build_recolor_request(image, items);
        let response = self.generate(&self.recolor_model, &request).await?;
        response.first_inline_image().ok_or(AppError::NoImageData)
    }
}
