mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roadscene")]
#[command(author, version, about = "Generate road scene images from text descriptions", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/roadscene/config.toml)
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a scene description
    Generate {
        /// Scene description (e.g., "A busy street in Paris at sunset")
        description: String,

        /// Directory to save generated images
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Negative prompt (empty string disables it)
        #[arg(long)]
        negative_prompt: Option<String>,

        /// Number of inference steps
        #[arg(short, long)]
        steps: Option<u32>,

        /// Image width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Image height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Guidance scale for CFG
        #[arg(short, long)]
        guidance_scale: Option<f32>,
    },

    /// Print the enhanced prompt for a description without generating
    Enhance {
        /// Scene description
        description: String,

        /// Random seed for reproducible feature selection
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the web UI and API server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// View or set configuration
    Config {
        /// Config key (e.g., "daemon.port", "generation.steps")
        key: Option<String>,

        /// Value to set (if omitted, shows current value)
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config_file {
        Some(path) => path,
        None => roadscene_core::Config::config_path()?,
    };

    match cli.command {
        Commands::Generate {
            description,
            output_dir,
            seed,
            negative_prompt,
            steps,
            width,
            height,
            guidance_scale,
        } => {
            let overrides = commands::generate::Overrides {
                output_dir,
                steps,
                width,
                height,
                guidance_scale,
            };
            if let Err(e) = commands::generate::execute(
                &config_path,
                &description,
                seed,
                negative_prompt,
                overrides,
            )
            .await
            {
                eprintln!("Error generating scene: {:#}", e);
                std::process::exit(1);
            }
        }
        Commands::Enhance { description, seed } => {
            commands::enhance::execute(&config_path, &description, seed)?;
        }
        Commands::Serve { port, host } => {
            commands::serve::execute(&config_path, port, host).await?;
        }
        Commands::Config { key, value } => {
            commands::config::execute(&config_path, key.as_deref(), value.as_deref())?;
        }
    }

    Ok(())
}
