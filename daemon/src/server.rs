use anyhow::Result;
use axum::Router;
use roadscene_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::monitor::MonitorContext;
use crate::state::AppState;

/// Build the application router with CORS and request tracing
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    api::routes(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: Config) -> Result<()> {
    let host = config.daemon.host.clone();
    let port = config.daemon.port;
    let monitor_interval = config.daemon.monitor_interval_secs;

    let state = Arc::new(AppState::new(config)?);
    let monitor = state.monitor.clone();
    let monitor_task = if monitor_interval > 0 {
        Some(monitor.spawn(Duration::from_secs(monitor_interval)))
    } else {
        None
    };

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!("Starting daemon on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(monitor.clone()))
        .await?;

    monitor.stop();
    if let Some(task) = monitor_task {
        task.await?;
    }

    tracing::info!("Daemon stopped");
    Ok(())
}

async fn shutdown_signal(monitor: MonitorContext) {
    let token = monitor.cancellation_token();
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Shutdown signal received"),
        _ = token.cancelled() => {}
    }
    monitor.stop();
}
