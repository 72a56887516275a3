//! Location detection boundary
//!
//! The enhancer only needs "the first place mentioned in the text, if any".
//! Anything richer (entity labels, multiple mentions) stays behind the
//! [`LocationExtractor`] trait.

use crate::error::ExtractionError;

/// Finds a location mentioned in free text
pub trait LocationExtractor: Send + Sync {
    /// Return the first location in text order, or `None` if there is none
    fn extract_location(&self, text: &str) -> Result<Option<String>, ExtractionError>;
}

impl<E: LocationExtractor + ?Sized> LocationExtractor for Box<E> {
    fn extract_location(&self, text: &str) -> Result<Option<String>, ExtractionError> {
        (**self).extract_location(text)
    }
}

impl<E: LocationExtractor + ?Sized> LocationExtractor for std::sync::Arc<E> {
    fn extract_location(&self, text: &str) -> Result<Option<String>, ExtractionError> {
        (**self).extract_location(text)
    }
}

/// Extractor that never finds a location
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationExtractor for NoLocation {
    fn extract_location(&self, _text: &str) -> Result<Option<String>, ExtractionError> {
        Ok(None)
    }
}

/// Place names recognised by [`Gazetteer::default`]
pub const DEFAULT_PLACES: &[&str] = &[
    "Amsterdam",
    "Bangkok",
    "Barcelona",
    "Beijing",
    "Berlin",
    "Buenos Aires",
    "Cairo",
    "California",
    "Chicago",
    "Dubai",
    "England",
    "France",
    "Germany",
    "Hong Kong",
    "India",
    "Istanbul",
    "Italy",
    "Japan",
    "London",
    "Los Angeles",
    "Madrid",
    "Mexico City",
    "Moscow",
    "Mumbai",
    "New York",
    "New York City",
    "Paris",
    "Rome",
    "San Francisco",
    "Seoul",
    "Shanghai",
    "Singapore",
    "Spain",
    "Sydney",
    "Texas",
    "Tokyo",
    "Toronto",
    "Vienna",
];

/// Dictionary lookup of known place names.
///
/// Matches whole words, ignoring ASCII case, but the match must start with an
/// uppercase letter in the input (so "nice weather" is not the city of Nice).
/// The returned string is the span as written in the input. When several
/// names start at the same position the longest one wins. Entries that do
/// not start with an uppercase letter could never match and are dropped.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    places: Vec<String>,
}

impl Gazetteer {
    pub fn new<I, S>(places: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut places: Vec<String> = places
            .into_iter()
            .map(|p| {
                let p: String = p.into();
                p.trim().to_string()
            })
            .filter(|p| !p.is_empty())
            .filter(|p| {
                let usable = p.chars().next().is_some_and(char::is_uppercase);
                if !usable {
                    tracing::warn!("Ignoring place {:?}: names must start with an uppercase letter", p);
                }
                usable
            })
            .collect();
        // Longest first so "New York City" beats "New York" at the same start
        places.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        places.dedup();
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    fn match_at(&self, text: &str, start: usize) -> Option<usize> {
        let rest = &text.as_bytes()[start..];
        self.places
            .iter()
            .filter(|p| p.len() <= rest.len() && rest[..p.len()].eq_ignore_ascii_case(p.as_bytes()))
            .map(String::len)
            .find(|&len| {
                text[start + len..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
            })
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACES.iter().copied())
    }
}

impl LocationExtractor for Gazetteer {
    fn extract_location(&self, text: &str) -> Result<Option<String>, ExtractionError> {
        let mut previous: Option<char> = None;
        for (start, c) in text.char_indices() {
            let at_word_start = previous.map_or(true, |p| !p.is_alphanumeric());
            previous = Some(c);
            if !at_word_start || !c.is_uppercase() {
                continue;
            }
            if let Some(len) = self.match_at(text, start) {
                return Ok(Some(text[start..start + len].to_string()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(gazetteer: &Gazetteer, text: &str) -> Option<String> {
        gazetteer.extract_location(text).unwrap()
    }

    #[test]
    fn finds_place_in_sentence() {
        let g = Gazetteer::default();
        assert_eq!(
            extract(&g, "A busy street in Paris at sunset"),
            Some("Paris".to_string())
        );
    }

    #[test]
    fn returns_first_occurrence_in_text_order() {
        let g = Gazetteer::default();
        assert_eq!(
            extract(&g, "Driving from Tokyo to London"),
            Some("Tokyo".to_string())
        );
    }

    #[test]
    fn prefers_longest_name_at_same_position() {
        let g = Gazetteer::default();
        assert_eq!(
            extract(&g, "Traffic in New York City tonight"),
            Some("New York City".to_string())
        );
        assert_eq!(
            extract(&g, "Traffic in New York tonight"),
            Some("New York".to_string())
        );
    }

    #[test]
    fn requires_word_boundaries() {
        let g = Gazetteer::new(["Rome"]);
        assert_eq!(extract(&g, "A Romeo statue"), None);
        assert_eq!(extract(&g, "XRome"), None);
        assert_eq!(extract(&g, "Streets of Rome."), Some("Rome".to_string()));
    }

    #[test]
    fn keeps_input_spelling() {
        let g = Gazetteer::new(["Paris"]);
        assert_eq!(extract(&g, "PARIS by night"), Some("PARIS".to_string()));
        assert_eq!(extract(&g, "a paris-style cafe"), None);
    }

    #[test]
    fn handles_non_ascii_names_and_text() {
        let g = Gazetteer::new(["Zürich", "São Paulo"]);
        assert_eq!(
            extract(&g, "Tram lines in Zürich, Switzerland"),
            Some("Zürich".to_string())
        );
        assert_eq!(
            extract(&g, "Ünterwegs nach São Paulo"),
            Some("São Paulo".to_string())
        );
    }

    #[test]
    fn nothing_found() {
        let g = Gazetteer::default();
        assert_eq!(extract(&g, "A scenic drive through the mountains"), None);
        assert_eq!(extract(&g, ""), None);
        assert_eq!(NoLocation.extract_location("Paris").unwrap(), None);
    }

    #[test]
    fn ignores_blank_and_duplicate_entries() {
        let g = Gazetteer::new(["Oslo", " ", "Oslo", ""]);
        assert_eq!(g.len(), 1);
        assert!(Gazetteer::new(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn drops_names_starting_lowercase() {
        let g = Gazetteer::new(["the Hague", "Delft", "'s-Hertogenbosch"]);
        assert_eq!(g.len(), 1);
        assert_eq!(extract(&g, "Canals in the Hague and Delft"), Some("Delft".to_string()));
    }
}
