use anyhow::Result;
use roadscene_core::Config;
use std::path::Path;

pub async fn execute(config_path: &Path, port: Option<u16>, host: Option<String>) -> Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(port) = port {
        config.daemon.port = port;
    }
    if let Some(host) = host {
        config.daemon.host = host;
    }

    println!("Starting roadscene daemon...");
    println!(
        "Web UI on http://{}:{}",
        config.daemon.host, config.daemon.port
    );
    println!("Diffusion backend: {}", config.backend.url);
    println!("\nAPI endpoints:");
    println!("  GET  /             - Scene generator page");
    println!("  GET  /health       - Health check");
    println!("  GET  /v1/stats     - Request counters");
    println!("  POST /v1/enhance   - Enhance a description");
    println!("  POST /v1/generate  - Generate an image (image/png)");
    println!("\nPress Ctrl+C to stop.\n");

    roadscene_daemon::run_server(config).await?;

    Ok(())
}
