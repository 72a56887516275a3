//! roadscene_enhancer - Prompt enhancement for road scene descriptions
//!
//! This crate turns a raw scene description into a richer image prompt:
//! - Classifies the description into a scene category by keyword
//! - Appends a random pair of feature phrases for that category
//! - Appends a location clause when a place name is mentioned
//!
//! Randomness and location detection are injected through the
//! [`RandomSource`] and [`LocationExtractor`] traits so the whole pipeline
//! can run deterministically in tests.

mod catalog;
mod enhancer;
mod error;
mod location;
mod random;
mod scene;

pub use catalog::{select_features, FeatureCatalog, FEATURES_PER_SCENE};
pub use enhancer::{enhance, Enhancement, Enhancer};
pub use error::{EnhanceError, ExtractionError};
pub use location::{Gazetteer, LocationExtractor, NoLocation, DEFAULT_PLACES};
pub use random::{RandomSource, RngSource};
pub use scene::{classify, SceneCategory};
