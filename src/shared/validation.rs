use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches any string with at least one non-whitespace character
    /// - Valid: "Flood", "  a  "
    /// - Invalid: "", "   ", "\n\t"
    pub static ref NOT_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();

    /// Tags are lowercase words joined by hyphens or underscores
    /// - Valid: "flood", "heavy-rain", "power_outage"
    /// - Invalid: "Flood", "-rain", "two words"
    pub static ref TAG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").unwrap();
}

/// Normalize user-supplied tags: trim, lowercase, drop empties and duplicates
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let t = tag.trim().to_lowercase().replace(' ', "_");
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}

/// Check that a coordinate pair lies on the globe
pub fn valid_coordinates(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank_regex() {
        assert!(NOT_BLANK_REGEX.is_match("Flood"));
        assert!(NOT_BLANK_REGEX.is_match("  a "));
        assert!(!NOT_BLANK_REGEX.is_match(""));
        assert!(!NOT_BLANK_REGEX.is_match("   \t\n"));
    }

    #[test]
    fn test_tag_regex() {
        assert!(TAG_REGEX.is_match("flood"));
        assert!(TAG_REGEX.is_match("heavy-rain"));
        assert!(TAG_REGEX.is_match("power_outage"));
        assert!(!TAG_REGEX.is_match("Flood"));
        assert!(!TAG_REGEX.is_match("-rain"));
        assert!(!TAG_REGEX.is_match("two words"));
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![
            " Flood ".to_string(),
            "flood".to_string(),
            "".to_string(),
            "Power Outage".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["flood", "power_outage"]);
    }

    #[test]
    fn test_valid_coordinates() {
        assert!(valid_coordinates(40.7, -74.0));
        assert!(!valid_coordinates(91.0, 0.0));
        assert!(!valid_coordinates(0.0, -181.0));
    }
}
