use axum::{extract::State, Json};
use roadscene_enhancer::Enhancement;
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub description: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

pub async fn enhance(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnhanceRequest>,
) -> Result<Json<Enhancement>, ApiError> {
    match state.generator.enhance(&request.description, request.seed) {
        Ok(enhancement) => {
            state.monitor.stats().record_enhancement();
            Ok(Json(enhancement))
        }
        Err(e) => {
            tracing::error!("Enhancement error: {}", e);
            state.monitor.stats().record_failure();
            Err(ApiError::server(format!("Enhancement error: {}", e)))
        }
    }
}
