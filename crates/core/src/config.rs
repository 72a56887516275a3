use anyhow::Result;
use roadscene_enhancer::{Enhancer, FeatureCatalog, Gazetteer, DEFAULT_PLACES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Web UI / API server settings
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Image generation backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Default generation parameters
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Prompt enhancement settings
    #[serde(default)]
    pub enhancer: EnhancerConfig,

    /// Where generated images are written
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Seconds between resource monitor reports
    #[serde(default = "default_monitor_interval_secs")]
    pub monitor_interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Endpoint that accepts a JSON generation request and returns an image
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Bearer token sent to the backend
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_size")]
    pub width: u32,

    #[serde(default = "default_size")]
    pub height: u32,

    /// Number of inference steps
    #[serde(default = "default_steps")]
    pub steps: u32,

    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,

    #[serde(default = "default_negative_prompt")]
    pub negative_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancerConfig {
    /// Feature phrases per scene category
    #[serde(default)]
    pub features: FeatureCatalog,

    /// Place names recognised in descriptions; each must start with an
    /// uppercase letter
    #[serde(default = "default_places")]
    pub places: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated images, relative to the working directory
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

fn default_port() -> u16 {
    8501
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_monitor_interval_secs() -> u64 {
    30
}

fn default_backend_url() -> String {
    "http://127.0.0.1:7860/v1/images/generate".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_size() -> u32 {
    512
}

fn default_steps() -> u32 {
    30
}

fn default_guidance_scale() -> f32 {
    7.0
}

fn default_negative_prompt() -> String {
    "low quality, blurry, noisy, animated".to_string()
}

fn default_places() -> Vec<String> {
    DEFAULT_PLACES.iter().map(|p| p.to_string()).collect()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            monitor_interval_secs: default_monitor_interval_secs(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            steps: default_steps(),
            guidance_scale: default_guidance_scale(),
            negative_prompt: default_negative_prompt(),
        }
    }
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            features: FeatureCatalog::default(),
            places: default_places(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl EnhancerConfig {
    /// Build an enhancer using the configured catalog and place list
    pub fn build(&self) -> Enhancer {
        let gazetteer = Gazetteer::new(self.places.iter().cloned());
        if gazetteer.is_empty() {
            tracing::warn!("No usable place names configured, location detection is disabled");
        } else {
            tracing::debug!("Location detection knows {} place names", gazetteer.len());
        }
        Enhancer::new(self.features.clone(), gazetteer)
    }
}

impl Config {
    /// Get the base directory: ~/.config/roadscene/
    pub fn base_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("USERPROFILE").map(PathBuf::from))
            .map_err(|_| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(".config").join("roadscene"))
    }

    /// Load config from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path: ~/.config/roadscene/config.toml
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.toml"))
    }
}
