//! roadscene_runtime_diffusion - Image generation runtime
//!
//! The diffusion model runs outside this process. This crate provides:
//! - The [`DiffusionModel`] contract and its request/response types
//! - [`RemoteDiffusion`], an HTTP backend implementing that contract
//! - [`SceneGenerator`], which enhances a description before generating

mod generator;
mod remote;

use anyhow::Result;
use async_trait::async_trait;
use roadscene_core::config::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use generator::{GenerateOptions, GeneratedScene, SceneGenerator};
pub use remote::{decode_image, BackendError, RemoteDiffusion};

/// Image generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub guidance_scale: f32,
    pub seed: Option<u64>,
}

impl ImageGenRequest {
    /// Request for `prompt` using the configured generation parameters
    pub fn from_settings(prompt: impl Into<String>, settings: &GenerationConfig) -> Self {
        let negative_prompt = Some(settings.negative_prompt.clone()).filter(|n| !n.is_empty());
        Self {
            prompt: prompt.into(),
            negative_prompt,
            width: settings.width,
            height: settings.height,
            steps: settings.steps,
            guidance_scale: settings.guidance_scale,
            seed: None,
        }
    }
}

impl Default for ImageGenRequest {
    fn default() -> Self {
        Self::from_settings(String::new(), &GenerationConfig::default())
    }
}

/// Image generation response
#[derive(Debug, Clone)]
pub struct ImageGenResponse {
    /// Raw pixel data (RGB, u8)
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageGenResponse {
    pub fn to_image(&self) -> Result<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| anyhow::anyhow!("Failed to create image from pixels"))
    }

    /// Save to `path`; the format follows the file extension
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image()?.save(path)?;
        Ok(())
    }

    /// Encode as PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_image()?
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Trait for diffusion model backends
#[async_trait]
pub trait DiffusionModel: Send + Sync {
    /// Generate an image from a text prompt
    async fn generate(&self, request: &ImageGenRequest) -> Result<ImageGenResponse>;

    /// Get the model name
    fn name(&self) -> &str;
}
