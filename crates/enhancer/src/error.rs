use thiserror::Error;

use crate::scene::SceneCategory;

/// Errors raised while enhancing a description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    /// The catalog holds too few phrases for the category to sample from
    #[error("scene category '{category}' has {available} feature phrase(s), at least {required} required")]
    InsufficientFeatures {
        category: SceneCategory,
        available: usize,
        required: usize,
    },

    /// A random source was asked for more items than it was given
    #[error("cannot choose {requested} item(s) from {available} without replacement")]
    SampleTooLarge { requested: usize, available: usize },
}

/// Errors raised by a [`LocationExtractor`](crate::LocationExtractor)
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("location extractor unavailable: {0}")]
    Unavailable(String),

    #[error("location extraction failed: {0}")]
    Failed(String),
}
