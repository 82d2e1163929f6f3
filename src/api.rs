use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::io::{ImagePayload, InputError};
use crate::orchestrator::{generate_stickers, GenerateError, Sticker};
use crate::prompts::{self, StickerStyle};
use crate::providers::ImageProvider;

#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn ImageProvider>,
    config: Arc<Config>,
}

pub async fn serve(provider: Arc<dyn ImageProvider>, config: Arc<Config>) -> anyhow::Result<()> {
    let bind = config.bind.clone();
    let app = router(AppState { provider, config });

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("stickersmash API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stickers", post(create_stickers))
        .route("/api/styles", get(list_styles))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage {
    data: String,
    mime_type: String,
}

#[derive(Deserialize)]
struct StickersReq {
    image: InlineImage,
    count: Option<usize>,
    styles: Option<Vec<StickerStyle>>,
}

#[derive(Serialize)]
struct StickersResp {
    stickers: Vec<Sticker>,
}

async fn create_stickers(
    State(st): State<AppState>,
    Json(req): Json<StickersReq>,
) -> Result<Json<StickersResp>, ApiErr> {
    let image = ImagePayload::from_base64(&req.image.data, &req.image.mime_type)
        .map_err(ApiErr::from_input)?;

    // Explicit styles win; otherwise draw a fresh random set.
    let styles = match req.styles {
        Some(styles) if !styles.is_empty() => styles,
        _ => prompts::pick_styles(req.count.unwrap_or(st.config.styles_per_run)),
    };

    let stickers = generate_stickers(
        st.provider.as_ref(),
        &image,
        &styles,
        st.config.max_image_bytes,
    )
    .await
    .map_err(ApiErr::from_generate)?;

    Ok(Json(StickersResp { stickers }))
}

async fn list_styles() -> Json<Vec<&'static str>> {
    Json(prompts::ALL_STYLES.iter().map(|s| s.label()).collect())
}

#[derive(Debug)]
struct ApiErr {
    status: StatusCode,
    code: String,
    message: String,
    suggestion: Option<String>,
}

impl ApiErr {
    fn from_input(e: InputError) -> Self {
        match e {
            InputError::NoImage => Self {
                status: StatusCode::BAD_REQUEST,
                code: "no_image".to_string(),
                message: "No image selected. Upload a photo first.".to_string(),
                suggestion: None,
            },
            InputError::TooLarge { .. } => Self {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                code: "image_too_large".to_string(),
                message: "File is too large. Please upload an image under 5MB.".to_string(),
                suggestion: None,
            },
            InputError::UnsupportedMediaType(mime) => Self {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                code: "unsupported_media_type".to_string(),
                message: format!("Unsupported image type: {mime}."),
                suggestion: Some("Use a JPG, PNG, or WebP image.".to_string()),
            },
            InputError::BadEncoding(_) => Self {
                status: StatusCode::BAD_REQUEST,
                code: "bad_request".to_string(),
                message: "Image data could not be decoded.".to_string(),
                suggestion: None,
            },
        }
    }

    fn from_generate(e: GenerateError) -> Self {
        match e {
            GenerateError::InvalidInput(input) => Self::from_input(input),
            GenerateError::NoStickersProduced => Self {
                status: StatusCode::BAD_GATEWAY,
                code: "generation_failed".to_string(),
                message: "Failed to generate any stickers. Please try again.".to_string(),
                suggestion: Some("Try a different image.".to_string()),
            },
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            code: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            suggestion: Option<String>,
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code,
                suggestion: self.suggestion,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_distinct_statuses_and_codes() {
        let no_image = ApiErr::from_input(InputError::NoImage);
        assert_eq!(no_image.status, StatusCode::BAD_REQUEST);
        assert_eq!(no_image.code, "no_image");

        let too_large = ApiErr::from_input(InputError::TooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        });
        assert_eq!(too_large.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.code, "image_too_large");

        let bad_type = ApiErr::from_input(InputError::UnsupportedMediaType("text/plain".into()));
        assert_eq!(bad_type.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(bad_type.code, "unsupported_media_type");
    }

    #[test]
    fn aggregate_failure_maps_to_bad_gateway() {
        let err = ApiErr::from_generate(GenerateError::NoStickersProduced);
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.code, "generation_failed");
    }

    #[test]
    fn invalid_input_keeps_its_own_mapping_through_generate() {
        let err = ApiErr::from_generate(GenerateError::InvalidInput(InputError::NoImage));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "no_image");
    }
}
