pub mod enhance;
pub mod generate;
pub mod ui;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::monitor::{MonitorState, StatsSnapshot};
use crate::state::AppState;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health))
        .route("/v1/stats", get(stats))
        .route("/v1/enhance", post(enhance::enhance))
        .route("/v1/generate", post(generate::generate))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub monitor: MonitorState,
    pub backend: String,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        monitor: state.monitor.state(),
        backend: state.generator.model_name().to_string(),
        stats: state.monitor.stats().snapshot(),
    })
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    r#type: &'static str,
}

/// JSON error body returned by the API handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    kind: &'static str,
}

impl ApiError {
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            kind: "server_error",
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            kind: "backend_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: ErrorDetail {
                    message: self.message,
                    r#type: self.kind,
                },
            }),
        )
            .into_response()
    }
}
