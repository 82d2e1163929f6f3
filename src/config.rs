use std::env;

use crate::io::MAX_IMAGE_BYTES;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime configuration, read once at startup. Everything has a default
/// except the Gemini credential.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    /// "gemini" | "mock"
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    /// Styles drawn per run when the request doesn't name any.
    pub styles_per_run: usize,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind: env::var("STICKER_BIND").unwrap_or_else(|_| "127.0.0.1:8787".into()),
            provider: env::var("STICKER_PROVIDER").unwrap_or_else(|_| "gemini".into()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            gemini_api_base: env::var("GEMINI_API_BASE")
                .ok()
                .map(|v| v.trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.into()),
            styles_per_run: env::var("STICKER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            max_image_bytes: env::var("STICKER_MAX_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(MAX_IMAGE_BYTES),
        }
    }
}
