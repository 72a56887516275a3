//! Image generation command

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use roadscene_core::{unique_output_path, Config};
use roadscene_runtime_diffusion::{GenerateOptions, RemoteDiffusion, SceneGenerator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Command line overrides for configured generation settings
#[derive(Debug, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub steps: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub guidance_scale: Option<f32>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.output_dir {
            config.output.directory = dir;
        }
        if let Some(steps) = self.steps {
            config.generation.steps = steps;
        }
        if let Some(width) = self.width {
            config.generation.width = width;
        }
        if let Some(height) = self.height {
            config.generation.height = height;
        }
        if let Some(guidance_scale) = self.guidance_scale {
            config.generation.guidance_scale = guidance_scale;
        }
    }
}

pub async fn execute(
    config_path: &Path,
    description: &str,
    seed: Option<u64>,
    negative_prompt: Option<String>,
    overrides: Overrides,
) -> Result<PathBuf> {
    let mut config = Config::load_from(config_path)?;
    overrides.apply(&mut config);

    let model = RemoteDiffusion::new(&config.backend)?;
    let generator = SceneGenerator::new(
        config.enhancer.build(),
        Arc::new(model),
        config.generation.clone(),
    );

    println!("Scene Generation");
    println!("================");
    println!("Backend: {}", generator.model_name());
    println!("Description: {}", description);
    println!(
        "Size: {}x{}",
        config.generation.width, config.generation.height
    );
    println!("Steps: {}", config.generation.steps);
    if let Some(seed) = seed {
        println!("Seed: {}", seed);
    }
    println!();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")?);
    spinner.set_message("Generating your road scene... This may take a few minutes.");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let options = GenerateOptions {
        seed,
        negative_prompt,
    };
    let result = generator.generate(description, &options).await;
    spinner.finish_and_clear();
    let scene = result?;

    println!("Enhanced prompt: {}", scene.prompt);

    let output_path = unique_output_path(&config.output.directory, "png")?;
    scene.image.save(&output_path)?;

    println!("Generated scene saved as: {}", output_path.display());
    if let Some(name) = output_path.file_name() {
        println!("Filename: {}", name.to_string_lossy());
    }

    Ok(output_path)
}
