//! roadscene_core - Core library shared by the CLI and daemon
//!
//! This crate provides:
//! - TOML configuration (daemon, backend, generation, enhancer settings)
//! - Unique output file naming for generated images

pub mod config;
pub mod output;

pub use config::Config;
pub use output::unique_output_path;
