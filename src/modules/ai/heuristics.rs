use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// "near Main St", "in Lower Manhattan, NYC", "at Riverside Park"
    static ref LOCATION_PHRASE_REGEX: Regex = Regex::new(
        r"\b(?i:near|in|at|around|along)\s+((?:[A-Z][\w'-]*)(?:\s+[A-Z][\w'-]*)*(?:,\s*[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)*)"
    )
    .unwrap();
}

/// Capitalised words that follow a preposition but are not places
const NON_PLACE_WORDS: &[&str] = &["The", "A", "An", "This", "That", "Our", "My", "Progress"];

/// Pull the first "near/in/at <Capitalised Words>" phrase out of free text
pub fn extract_location_heuristic(text: &str) -> Option<String> {
    LOCATION_PHRASE_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['.', ',']).trim().to_string())
        .find(|candidate| {
            let first = candidate.split_whitespace().next().unwrap_or("");
            !candidate.is_empty() && !NON_PLACE_WORDS.contains(&first)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_after_near() {
        assert_eq!(
            extract_location_heuristic("River overflow near Main St").as_deref(),
            Some("Main St")
        );
    }

    #[test]
    fn test_city_with_region() {
        assert_eq!(
            extract_location_heuristic("Heavy flooding in Lower Manhattan, NYC. Stay safe").as_deref(),
            Some("Lower Manhattan, NYC")
        );
    }

    #[test]
    fn test_lowercase_words_are_not_places() {
        assert!(extract_location_heuristic("water is rising in the basement").is_none());
        assert!(extract_location_heuristic("").is_none());
    }

    #[test]
    fn test_skips_articles() {
        assert_eq!(
            extract_location_heuristic("Fire at The warehouse, then smoke near Brooklyn Bridge")
                .as_deref(),
            Some("Brooklyn Bridge")
        );
    }
}
