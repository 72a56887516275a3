use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use roadscene_enhancer::EnhanceError;
use roadscene_runtime_diffusion::GenerateOptions;
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

pub const SCENE_CATEGORY_HEADER: HeaderName = HeaderName::from_static("x-scene-category");
pub const ENHANCED_PROMPT_HEADER: HeaderName = HeaderName::from_static("x-enhanced-prompt");

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// Generate an image and return it as `image/png`.
///
/// The enhanced prompt and scene category travel in response headers.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let options = GenerateOptions {
        seed: request.seed,
        negative_prompt: request.negative_prompt,
    };

    let scene = match state.generator.generate(&request.description, &options).await {
        Ok(scene) => scene,
        Err(e) => {
            state.monitor.stats().record_failure();
            let error = if e.downcast_ref::<EnhanceError>().is_some() {
                tracing::error!("Enhancement error: {}", e);
                ApiError::server(format!("Enhancement error: {}", e))
            } else {
                ApiError::backend(format!("Generation error: {}", e))
            };
            return error.into_response();
        }
    };

    let png = match scene.image.to_png() {
        Ok(png) => png,
        Err(e) => {
            tracing::error!("Failed to encode image: {}", e);
            state.monitor.stats().record_failure();
            return ApiError::server(format!("Failed to encode image: {}", e)).into_response();
        }
    };

    state.monitor.stats().record_generation();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(
        SCENE_CATEGORY_HEADER,
        HeaderValue::from_static(scene.category.as_str()),
    );
    match HeaderValue::from_str(&scene.prompt) {
        Ok(value) => {
            headers.insert(ENHANCED_PROMPT_HEADER, value);
        }
        Err(_) => tracing::debug!("Enhanced prompt is not a valid header value, omitting it"),
    }

    (headers, png).into_response()
}
