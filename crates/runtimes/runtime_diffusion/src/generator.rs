//! Scene generation: enhance a description, then render it

use anyhow::Result;
use roadscene_core::config::GenerationConfig;
use roadscene_enhancer::{EnhanceError, Enhancement, Enhancer, RngSource, SceneCategory};
use std::sync::Arc;

use crate::{DiffusionModel, ImageGenRequest, ImageGenResponse};

/// Per-call generation options
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Seeds both feature selection and the diffusion backend
    pub seed: Option<u64>,
    /// Overrides the configured negative prompt; empty disables it
    pub negative_prompt: Option<String>,
}

#[derive(Debug)]
pub struct GeneratedScene {
    pub category: SceneCategory,
    /// The enhanced prompt sent to the model
    pub prompt: String,
    pub image: ImageGenResponse,
}

#[derive(Clone)]
pub struct SceneGenerator {
    enhancer: Enhancer,
    model: Arc<dyn DiffusionModel>,
    settings: GenerationConfig,
}

impl SceneGenerator {
    pub fn new(
        enhancer: Enhancer,
        model: Arc<dyn DiffusionModel>,
        settings: GenerationConfig,
    ) -> Self {
        Self {
            enhancer,
            model,
            settings,
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn settings(&self) -> &GenerationConfig {
        &self.settings
    }

    /// Enhance without generating. A seed makes the feature choice repeatable.
    pub fn enhance(&self, description: &str, seed: Option<u64>) -> Result<Enhancement, EnhanceError> {
        let mut rng = RngSource::from_seed_opt(seed);
        self.enhancer.enhance_detailed(description, &mut rng)
    }

    pub async fn generate(&self, description: &str, options: &GenerateOptions) -> Result<GeneratedScene> {
        let enhancement = self.enhance(description, options.seed)?;
        tracing::info!("Processing enhanced description: {}", enhancement.enhanced);

        let mut request = ImageGenRequest::from_settings(enhancement.enhanced.clone(), &self.settings);
        request.seed = options.seed;
        if let Some(negative_prompt) = &options.negative_prompt {
            request.negative_prompt = Some(negative_prompt.clone()).filter(|n| !n.is_empty());
        }

        let image = match self.model.generate(&request).await {
            Ok(image) => image,
            Err(e) => {
                tracing::error!("Error in scene generation: {}", e);
                return Err(e);
            }
        };

        Ok(GeneratedScene {
            category: enhancement.category,
            prompt: enhancement.enhanced,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roadscene_enhancer::FeatureCatalog;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        requests: Mutex<Vec<ImageGenRequest>>,
    }

    #[async_trait]
    impl DiffusionModel for Recording {
        async fn generate(&self, request: &ImageGenRequest) -> Result<ImageGenResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ImageGenResponse {
                pixels: vec![0; 3],
                width: 1,
                height: 1,
            })
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct Broken;

    #[async_trait]
    impl DiffusionModel for Broken {
        async fn generate(&self, _request: &ImageGenRequest) -> Result<ImageGenResponse> {
            anyhow::bail!("out of memory")
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn generator(model: Arc<dyn DiffusionModel>) -> SceneGenerator {
        SceneGenerator::new(Enhancer::default(), model, GenerationConfig::default())
    }

    #[tokio::test]
    async fn sends_enhanced_prompt_to_model() {
        let model = Arc::new(Recording::default());
        let scene = generator(model.clone())
            .generate("A busy street in Paris at sunset", &GenerateOptions::default())
            .await
            .unwrap();

        assert_eq!(scene.category, SceneCategory::CityRoad);
        assert!(scene.prompt.starts_with("A busy street in Paris at sunset, featuring "));
        assert!(scene.prompt.ends_with("set in Paris, known for its unique cityscape."));

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, scene.prompt);
        assert_eq!(
            requests[0].negative_prompt.as_deref(),
            Some("low quality, blurry, noisy, animated")
        );
        assert_eq!(requests[0].seed, None);
    }

    #[tokio::test]
    async fn seed_repeats_prompt_and_reaches_model() {
        let model = Arc::new(Recording::default());
        let generator = generator(model.clone());
        let options = GenerateOptions {
            seed: Some(1234),
            negative_prompt: None,
        };

        let first = generator.generate("Freeway at dawn", &options).await.unwrap();
        let second = generator.generate("Freeway at dawn", &options).await.unwrap();
        assert_eq!(first.prompt, second.prompt);
        assert!(model.requests.lock().unwrap().iter().all(|r| r.seed == Some(1234)));
    }

    #[tokio::test]
    async fn negative_prompt_override() {
        let model = Arc::new(Recording::default());
        let generator = generator(model.clone());

        let custom = GenerateOptions {
            seed: None,
            negative_prompt: Some("people".into()),
        };
        generator.generate("Rural lane", &custom).await.unwrap();

        let disabled = GenerateOptions {
            seed: None,
            negative_prompt: Some(String::new()),
        };
        generator.generate("Rural lane", &disabled).await.unwrap();

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].negative_prompt.as_deref(), Some("people"));
        assert_eq!(requests[1].negative_prompt, None);
    }

    #[tokio::test]
    async fn model_errors_propagate() {
        let result = generator(Arc::new(Broken))
            .generate("Highway", &GenerateOptions::default())
            .await;
        assert!(result.unwrap_err().to_string().contains("out of memory"));
    }

    #[tokio::test]
    async fn catalog_errors_stop_before_the_model() {
        let model = Arc::new(Recording::default());
        let enhancer = Enhancer::new(
            FeatureCatalog::empty().with(SceneCategory::Highway, ["overhead signs"]),
            roadscene_enhancer::NoLocation,
        );
        let generator = SceneGenerator::new(enhancer, model.clone(), GenerationConfig::default());

        let err = generator
            .generate("highway traffic", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<EnhanceError>().is_some());
        assert!(model.requests.lock().unwrap().is_empty());
    }
}
