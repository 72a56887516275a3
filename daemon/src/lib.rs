//! roadscene_daemon - Web UI and JSON API server
//!
//! This crate provides the daemon server that:
//! - Serves the scene generator web page
//! - Exposes prompt enhancement and image generation endpoints
//! - Runs a resource monitor for the lifetime of the server

pub mod api;
pub mod monitor;
pub mod server;
pub mod state;

pub use server::{router, run_server};
pub use state::AppState;
