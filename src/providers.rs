use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{ImageBuffer, Rgba};
use serde::Deserialize;
use serde_json::json;
use std::fmt;

use crate::io::ImagePayload;

#[derive(Debug)]
pub enum ProviderError {
    RateLimited,
    Http(String),
    /// Well-formed response with no image part in it.
    NoImage,
    Fatal(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::RateLimited => write!(f, "rate limited by provider"),
            ProviderError::Http(msg) => write!(f, "http error: {msg}"),
            ProviderError::NoImage => write!(f, "no image in provider response"),
            ProviderError::Fatal(msg) => write!(f, "fatal provider error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// One produced image: decoded bytes plus the media type the provider
/// declared for them.
#[derive(Debug, Clone)]
pub struct ProviderImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// The remote generation capability: one image plus one instruction string
/// in, one image (or a failure) out.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(
        &self,
        image: &ImagePayload,
        prompt: &str,
    ) -> Result<ProviderImage, ProviderError>;
    fn name(&self) -> &'static str;
}

pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            api_base,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Deserialize)]
struct GenerateContentResp {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    data: Option<String>,
}

// The API emits both casings depending on transport; accept either.
fn extract_image(resp: GenerateContentResp) -> Result<ProviderImage, ProviderError> {
    for candidate in resp.candidates {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            let Some(inline) = part.inline_data else {
                continue;
            };
            let Some(data) = inline.data.filter(|d| !d.is_empty()) else {
                continue;
            };
            let bytes = BASE64
                .decode(data.as_bytes())
                .map_err(|e| ProviderError::Fatal(format!("image base64 decode failed: {e}")))?;
            let mime_type = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
            return Ok(ProviderImage { bytes, mime_type });
        }
    }
    Err(ProviderError::NoImage)
}

#[async_trait]
impl ImageProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(
        &self,
        image: &ImagePayload,
        prompt: &str,
    ) -> Result<ProviderImage, ProviderError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": image.mime_type, "data": image.to_inline_base64() } },
                    { "text": prompt },
                ]
            }],
            "generationConfig": { "responseModalities": ["IMAGE"] }
        });

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Http(format!("{status}: {detail}")));
        }

        let parsed: GenerateContentResp = resp
            .json()
            .await
            .map_err(|e| ProviderError::Fatal(format!("response parse failed: {e}")))?;
        extract_image(parsed)
    }
}

/// Offline provider: synthesizes a deterministic test-card PNG per prompt,
/// so the service runs without a credential.
pub struct MockProvider;

#[async_trait]
impl ImageProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        _image: &ImagePayload,
        prompt: &str,
    ) -> Result<ProviderImage, ProviderError> {
        let w = 256u32;
        let h = 256u32;
        let tint = (prompt.len() % 255) as u8;
        let mut img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(w, h);
        for (x, y, p) in img.enumerate_pixels_mut() {
            let v = ((x ^ y) & 0xFF) as u8;
            *p = Rgba([v, 255 - v, tint, 255]);
        }
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| ProviderError::Fatal(format!("encode error: {e}")))?;

        Ok(ProviderImage {
            bytes: png,
            mime_type: "image/png".to_string(),
        })
    }
}
