use anyhow::Result;
use roadscene_core::Config;
use roadscene_runtime_diffusion::{DiffusionModel, RemoteDiffusion, SceneGenerator};
use std::sync::Arc;

use crate::monitor::MonitorContext;

pub struct AppState {
    pub config: Config,
    pub generator: SceneGenerator,
    pub monitor: MonitorContext,
}

impl AppState {
    /// State backed by the configured remote diffusion backend
    pub fn new(config: Config) -> Result<Self> {
        let model = RemoteDiffusion::new(&config.backend)?;
        tracing::info!("Using diffusion backend at {}", config.backend.url);
        Ok(Self::with_model(config, Arc::new(model)))
    }

    pub fn with_model(config: Config, model: Arc<dyn DiffusionModel>) -> Self {
        let generator = SceneGenerator::new(
            config.enhancer.build(),
            model,
            config.generation.clone(),
        );
        Self {
            config,
            generator,
            monitor: MonitorContext::new(),
        }
    }
}
