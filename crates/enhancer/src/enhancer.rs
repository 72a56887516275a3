//! Description enhancement: classify, add features, add location

use serde::Serialize;
use std::sync::Arc;

use crate::catalog::{select_features, FeatureCatalog};
use crate::error::EnhanceError;
use crate::location::{Gazetteer, LocationExtractor};
use crate::random::RandomSource;
use crate::scene::{classify, SceneCategory};

/// Result of enhancing one description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enhancement {
    pub category: SceneCategory,
    pub features: Vec<String>,
    pub location: Option<String>,
    pub enhanced: String,
}

/// Enhance a description into an image prompt.
///
/// The output always starts with `description` unchanged. Feature selection
/// errors propagate; location extractor errors are logged and treated as no
/// location found.
pub fn enhance<R, E>(
    description: &str,
    catalog: &FeatureCatalog,
    rng: &mut R,
    extractor: &E,
) -> Result<String, EnhanceError>
where
    R: RandomSource + ?Sized,
    E: LocationExtractor + ?Sized,
{
    enhance_detailed(description, catalog, rng, extractor).map(|e| e.enhanced)
}

fn enhance_detailed<R, E>(
    description: &str,
    catalog: &FeatureCatalog,
    rng: &mut R,
    extractor: &E,
) -> Result<Enhancement, EnhanceError>
where
    R: RandomSource + ?Sized,
    E: LocationExtractor + ?Sized,
{
    let category = classify(description);
    let features: Vec<String> = select_features(category, catalog, rng)?
        .iter()
        .map(|f| printable(f))
        .collect();

    let mut enhanced = String::from(description);
    if !features.is_empty() {
        enhanced.push_str(", featuring ");
        enhanced.push_str(&features.join(", "));
    }

    // Detection runs on the caller's text, never on the appended clauses
    let location = match extractor.extract_location(description) {
        Ok(location) => location.map(|l| printable(&l)).filter(|l| !l.is_empty()),
        Err(e) => {
            tracing::warn!(error = %e, "Location extraction failed, continuing without location");
            None
        }
    };
    if let Some(location) = &location {
        enhanced.push_str(&format!(
            ". This scene is set in {}, known for its unique cityscape.",
            location
        ));
    }

    Ok(Enhancement {
        category,
        features,
        location,
        enhanced,
    })
}

/// Strip control characters from text appended to the prompt
fn printable(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

/// Shareable enhancer bundling a catalog with a location extractor
#[derive(Clone)]
pub struct Enhancer {
    catalog: Arc<FeatureCatalog>,
    extractor: Arc<dyn LocationExtractor>,
}

impl Enhancer {
    pub fn new(catalog: FeatureCatalog, extractor: impl LocationExtractor + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
            extractor: Arc::new(extractor),
        }
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn enhance<R: RandomSource + ?Sized>(
        &self,
        description: &str,
        rng: &mut R,
    ) -> Result<String, EnhanceError> {
        enhance(description, &self.catalog, rng, self.extractor.as_ref())
    }

    /// Like [`enhance`](Self::enhance) but also reports the intermediate steps
    pub fn enhance_detailed<R: RandomSource + ?Sized>(
        &self,
        description: &str,
        rng: &mut R,
    ) -> Result<Enhancement, EnhanceError> {
        enhance_detailed(description, &self.catalog, rng, self.extractor.as_ref())
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(FeatureCatalog::default(), Gazetteer::default())
    }
}

impl std::fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enhancer")
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}
