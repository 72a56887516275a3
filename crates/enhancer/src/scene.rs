//! Keyword-based scene classification

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Coarse classification of a road scene description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneCategory {
    Highway,
    CityRoad,
    RuralRoad,
    GeneralRoad,
}

impl SceneCategory {
    /// Categories tested by [`classify`], highest priority first
    pub const PRIORITY: [SceneCategory; 3] = [
        SceneCategory::Highway,
        SceneCategory::CityRoad,
        SceneCategory::RuralRoad,
    ];

    /// Lowercase tokens that select this category
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SceneCategory::Highway => &["highway", "freeway", "interstate"],
            SceneCategory::CityRoad => &["city", "urban", "street"],
            SceneCategory::RuralRoad => &["rural", "countryside", "village"],
            SceneCategory::GeneralRoad => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneCategory::Highway => "highway",
            SceneCategory::CityRoad => "city_road",
            SceneCategory::RuralRoad => "rural_road",
            SceneCategory::GeneralRoad => "general_road",
        }
    }
}

impl fmt::Display for SceneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SceneCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "highway" => Ok(SceneCategory::Highway),
            "city_road" => Ok(SceneCategory::CityRoad),
            "rural_road" => Ok(SceneCategory::RuralRoad),
            "general_road" => Ok(SceneCategory::GeneralRoad),
            other => Err(format!("unknown scene category: {}", other)),
        }
    }
}

/// Classify a description by exact, case-insensitive token match.
///
/// Tokens are produced by lowercasing and splitting on whitespace only, so
/// punctuation stays attached ("street," does not count as "street").
pub fn classify(text: &str) -> SceneCategory {
    let lowered = text.to_lowercase();
    let tokens: HashSet<&str> = lowered.split_whitespace().collect();

    let category = SceneCategory::PRIORITY
        .into_iter()
        .find(|category| category.keywords().iter().any(|k| tokens.contains(k)))
        .unwrap_or(SceneCategory::GeneralRoad);

    tracing::debug!(%category, "classified description");
    category
}
