use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::io::{ImagePayload, InputError};
use crate::prompts::{prompt_for, StickerStyle};
use crate::providers::{ImageProvider, ProviderImage};

/// One generated sticker. Created on a successful provider call, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub id: String,
    pub image_url: String,
    pub style: StickerStyle,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum GenerateError {
    /// Rejected before any remote call was issued.
    InvalidInput(InputError),
    /// Every style attempt in the run failed.
    NoStickersProduced,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InvalidInput(e) => write!(f, "invalid input: {e}"),
            GenerateError::NoStickersProduced => {
                write!(f, "no stickers produced: every style attempt failed")
            }
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::InvalidInput(e) => Some(e),
            GenerateError::NoStickersProduced => None,
        }
    }
}

impl From<InputError> for GenerateError {
    fn from(e: InputError) -> Self {
        GenerateError::InvalidInput(e)
    }
}

fn data_url(image: &ProviderImage) -> String {
    format!("data:{};base64,{}", image.mime_type, BASE64.encode(&image.bytes))
}

/// Run one generation batch: one concurrent provider call per style, joined
/// as a barrier. A failed style only logs and drops out; the run fails as a
/// whole only when nothing came back.
pub async fn generate_stickers(
    provider: &dyn ImageProvider,
    image: &ImagePayload,
    styles: &[StickerStyle],
    max_image_bytes: usize,
) -> Result<Vec<Sticker>, GenerateError> {
    image.validate(max_image_bytes)?;

    info!(
        provider = provider.name(),
        styles = styles.len(),
        "starting sticker run"
    );

    let attempts = styles.iter().map(|&style| {
        let prompt = prompt_for(style);
        async move {
            match provider.generate(image, &prompt).await {
                Ok(img) => Some(Sticker {
                    id: Uuid::new_v4().to_string(),
                    image_url: data_url(&img),
                    style,
                    prompt,
                    created_at: Utc::now(),
                }),
                Err(e) => {
                    warn!(style = %style, error = %e, "style attempt failed");
                    None
                }
            }
        }
    });

    let stickers: Vec<Sticker> = join_all(attempts).await.into_iter().flatten().collect();

    if stickers.is_empty() {
        return Err(GenerateError::NoStickersProduced);
    }
    info!(
        produced = stickers.len(),
        requested = styles.len(),
        "sticker run finished"
    );
    Ok(stickers)
}
