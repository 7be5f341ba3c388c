//! GeminiClient のHTTP往復テスト
//!
//! ローカルのTCPサーバーで固定レスポンスを返し、パース経路を検証する。

use garment_recolor::ai_provider::FashionAi;
use garment_recolor::config::Config;
use garment_recolor::error::AppError;
use garment_recolor::gemini::GeminiClient;
use garment_recolor_common::{items_from_detections, ItemCategory, RawDetection, WorkingImage};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 1リクエストだけ受けて `status` と `body` を返すサーバーを起動し、ベースURLを返す
async fn serve_once(status: u16, body: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{}", addr), handle)
}

/// ヘッダーとContent-Length分のボディを読む
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn client(base_url: &str) -> GeminiClient {
    GeminiClient::new("test-key".into(), &Config::default())
        .unwrap()
        .with_base_url(base_url)
}

fn image() -> WorkingImage {
    WorkingImage::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap()
}

#[tokio::test]
async fn test_detect_parses_items() {
    let text = json!([
        { "name": "Áo khoác", "category": "main", "confidence": 0.93, "box": [50, 60, 700, 800] },
        { "name": "Túi áo", "category": "detail", "confidence": 0.71, "box": [300, 100, 400, 200] }
    ])
    .to_string();
    let body = json!({
        "candidates": [ { "content": { "parts": [ { "text": text } ] } } ]
    })
    .to_string();

    let (base_url, server) = serve_once(200, body).await;
    let items = client(&base_url).detect(&image()).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Áo khoác");
    assert_eq!(items[0].category, ItemCategory::Main);
    assert_eq!(items[1].category, ItemCategory::Detail);
    assert!(items[0].id.starts_with("item-0-"));
    assert!(items[1].id.starts_with("item-1-"));
    assert_eq!(items[0].color, "#ffffff");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /gemini-3-flash-preview:generateContent?key=test-key"));
    // 画像の実MIMEタイプで送る
    assert!(request.contains("image/png"));
    assert!(request.contains("responseSchema"));
}

#[tokio::test]
async fn test_detect_malformed_text_is_error() {
    let body = json!({
        "candidates": [ { "content": { "parts": [ { "text": "[{\"name\": 1}]" } ] } } ]
    })
    .to_string();

    let (base_url, _server) = serve_once(200, body).await;
    let result = client(&base_url).detect(&image()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_detect_without_text_part_is_parse_error() {
    let body = json!({ "candidates": [ { "content": { "parts": [] } } ] }).to_string();

    let (base_url, _server) = serve_once(200, body).await;
    let err = client(&base_url).detect(&image()).await.unwrap_err();
    assert!(matches!(err, AppError::ApiParse(_)));
}

#[tokio::test]
async fn test_detect_http_error() {
    let (base_url, _server) = serve_once(500, r#"{"error":"boom"}"#.to_string()).await;
    let err = client(&base_url).detect(&image()).await.unwrap_err();
    assert!(matches!(err, AppError::ApiCall(_)));
}

#[tokio::test]
async fn test_recolor_returns_inline_image() {
    let body = json!({
        "candidates": [ { "content": { "parts": [
            { "text": "Here is the result" },
            { "inlineData": { "mimeType": "image/jpeg", "data": "cmVzdWx0" } }
        ] } } ]
    })
    .to_string();

    let items = items_from_detections(
        vec![RawDetection {
            name: "Áo".into(),
            category: ItemCategory::Main,
            confidence: 0.9,
            bbox: [0.0, 0.0, 1000.0, 1000.0],
        }],
        1,
    );

    let (base_url, server) = serve_once(200, body).await;
    let result = client(&base_url).recolor(&image(), &items).await.unwrap();
    assert_eq!(result.data_url(), "data:image/png;base64,cmVzdWx0");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /gemini-2.5-flash-image:generateContent"));
}

#[tokio::test]
async fn test_recolor_without_image_part() {
    let body = json!({
        "candidates": [ { "content": { "parts": [ { "text": "I cannot do that" } ] } } ]
    })
    .to_string();

    let (base_url, _server) = serve_once(200, body).await;
    let err = client(&base_url).recolor(&image(), &[]).await.unwrap_err();
    assert!(matches!(err, AppError::NoImageData));
}
