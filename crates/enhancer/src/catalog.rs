//! Feature phrases per scene category

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::EnhanceError;
use crate::random::RandomSource;
use crate::scene::SceneCategory;

/// Number of feature phrases appended to a classified description
pub const FEATURES_PER_SCENE: usize = 2;

/// Ordered feature phrases for each scene category.
///
/// Serializes as a table keyed by category name, e.g.
///
/// ```toml
/// highway = ["clear lane markings", "overhead signs", "multiple lanes"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct FeatureCatalog {
    phrases: BTreeMap<SceneCategory, Vec<String>>,
}

impl FeatureCatalog {
    /// An empty catalog; every category yields no features
    pub fn empty() -> Self {
        Self {
            phrases: BTreeMap::new(),
        }
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with<I, S>(mut self, category: SceneCategory, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(category, phrases);
        self
    }

    /// Replace the phrases for a category
    pub fn insert<I, S>(&mut self, category: SceneCategory, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases
            .insert(category, phrases.into_iter().map(Into::into).collect::<Vec<String>>());
    }

    pub fn phrases(&self, category: SceneCategory) -> Option<&[String]> {
        self.phrases.get(&category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = SceneCategory> + '_ {
        self.phrases.keys().copied()
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::empty()
            .with(
                SceneCategory::Highway,
                ["clear lane markings", "overhead signs", "multiple lanes"],
            )
            .with(
                SceneCategory::CityRoad,
                [
                    "synchronized traffic signals",
                    "bright billboards",
                    "marked crosswalks",
                ],
            )
            .with(
                SceneCategory::RuralRoad,
                [
                    "natural roadside vegetation",
                    "curvy paths",
                    "scenic landscapes",
                ],
            )
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for FeatureCatalog {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut catalog = Self::empty();
        for (name, phrases) in raw {
            catalog.insert(name.parse()?, phrases);
        }
        Ok(catalog)
    }
}

impl From<FeatureCatalog> for BTreeMap<String, Vec<String>> {
    fn from(catalog: FeatureCatalog) -> Self {
        catalog
            .phrases
            .into_iter()
            .map(|(category, phrases)| (category.as_str().to_string(), phrases))
            .collect()
    }
}

/// Draw [`FEATURES_PER_SCENE`] distinct phrases for `category`.
///
/// `GeneralRoad` and categories missing from the catalog yield an empty list.
/// A category with fewer phrases than required is a catalog error, never a
/// shortened sample.
pub fn select_features<R>(
    category: SceneCategory,
    catalog: &FeatureCatalog,
    rng: &mut R,
) -> Result<Vec<String>, EnhanceError>
where
    R: RandomSource + ?Sized,
{
    if category == SceneCategory::GeneralRoad {
        return Ok(Vec::new());
    }
    let Some(phrases) = catalog.phrases(category) else {
        return Ok(Vec::new());
    };

    if phrases.len() < FEATURES_PER_SCENE {
        return Err(EnhanceError::InsufficientFeatures {
            category,
            available: phrases.len(),
            required: FEATURES_PER_SCENE,
        });
    }

    let picked = rng.choose_indices(phrases.len(), FEATURES_PER_SCENE)?;
    Ok(picked.into_iter().map(|i| phrases[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;

    #[test]
    fn reference_catalog_has_three_phrases_each() {
        let catalog = FeatureCatalog::default();
        for category in SceneCategory::PRIORITY {
            assert_eq!(catalog.phrases(category).map(<[String]>::len), Some(3));
        }
        assert!(catalog.phrases(SceneCategory::GeneralRoad).is_none());
    }

    #[test]
    fn selects_two_distinct_phrases_from_category() {
        let catalog = FeatureCatalog::default();
        let mut rng = RngSource::from_os();
        for category in SceneCategory::PRIORITY {
            let allowed = catalog.phrases(category).unwrap();
            for _ in 0..20 {
                let picked = select_features(category, &catalog, &mut rng).unwrap();
                assert_eq!(picked.len(), 2);
                assert_ne!(picked[0], picked[1]);
                assert!(picked.iter().all(|p| allowed.contains(p)));
            }
        }
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let catalog = FeatureCatalog::default();
        let first = select_features(
            SceneCategory::Highway,
            &catalog,
            &mut RngSource::seeded(2024),
        )
        .unwrap();
        let second = select_features(
            SceneCategory::Highway,
            &catalog,
            &mut RngSource::seeded(2024),
        )
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn general_road_and_missing_categories_select_nothing() {
        let mut rng = RngSource::seeded(0);
        let catalog = FeatureCatalog::default();
        assert!(select_features(SceneCategory::GeneralRoad, &catalog, &mut rng)
            .unwrap()
            .is_empty());

        let sparse = FeatureCatalog::empty().with(SceneCategory::Highway, ["a", "b"]);
        assert!(select_features(SceneCategory::RuralRoad, &sparse, &mut rng)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn single_phrase_category_is_an_error() {
        let catalog = FeatureCatalog::empty().with(SceneCategory::Highway, ["overhead signs"]);
        let err = select_features(SceneCategory::Highway, &catalog, &mut RngSource::seeded(0))
            .unwrap_err();
        assert_eq!(
            err,
            EnhanceError::InsufficientFeatures {
                category: SceneCategory::Highway,
                available: 1,
                required: 2,
            }
        );
    }

    #[test]
    fn exactly_two_phrases_are_both_used() {
        let catalog = FeatureCatalog::empty().with(SceneCategory::CityRoad, ["x", "y"]);
        let mut picked =
            select_features(SceneCategory::CityRoad, &catalog, &mut RngSource::seeded(3)).unwrap();
        picked.sort();
        assert_eq!(picked, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn loads_from_toml_table() {
        let catalog: FeatureCatalog = toml::from_str(
            r#"
            highway = ["toll booths", "crash barriers", "exit ramps"]
            rural_road = ["dirt shoulders", "hay bales"]
            "#,
        )
        .unwrap();

        assert_eq!(
            catalog.phrases(SceneCategory::Highway).unwrap()[0],
            "toll booths"
        );
        assert_eq!(catalog.phrases(SceneCategory::RuralRoad).unwrap().len(), 2);
        assert!(catalog.phrases(SceneCategory::CityRoad).is_none());
    }

    #[test]
    fn rejects_unknown_category_names() {
        let result: Result<FeatureCatalog, _> = toml::from_str(r#"motorway = ["a", "b"]"#);
        assert!(result.is_err());
    }
}
