//! Keyword and distance matching between feed items and tracked disasters.

use std::collections::HashSet;

use uuid::Uuid;

use crate::shared::geo::Coordinates;

/// Words too common to say anything about which disaster a text is about
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "this", "that", "are", "was", "were", "has", "have",
    "had", "not", "but", "all", "any", "can", "our", "out", "you", "your", "its", "into", "near",
    "over", "more", "now", "new", "area", "areas", "county", "state", "city", "street",
    "unknown", "location", "due",
];

/// What a feed item is matched against
#[derive(Debug, Clone)]
pub struct DisasterRef {
    pub id: Uuid,
    pub title: String,
    pub location_name: String,
    pub tags: Vec<String>,
    pub coordinates: Option<Coordinates>,
}

/// Lowercased significant words of a text (3+ chars, not a stopword)
pub fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .collect()
}

impl DisasterRef {
    /// Keywords from title, tags and location
    pub fn keywords(&self) -> HashSet<String> {
        let mut words = keywords(&self.title);
        words.extend(keywords(&self.location_name));
        for tag in &self.tags {
            words.extend(keywords(tag));
        }
        words
    }

    pub fn location_keywords(&self) -> HashSet<String> {
        keywords(&self.location_name)
    }
}

/// Disaster sharing the most keywords with `text`; ties go to the earlier disaster
pub fn match_by_keywords(text: &str, disasters: &[DisasterRef]) -> Option<Uuid> {
    let words = keywords(text);
    best_overlap(&words, disasters, DisasterRef::keywords)
}

/// Disaster whose location name shares the most words with `location_text`
pub fn match_by_location(location_text: &str, disasters: &[DisasterRef]) -> Option<Uuid> {
    let words = keywords(location_text);
    best_overlap(&words, disasters, DisasterRef::location_keywords)
}

fn best_overlap(
    words: &HashSet<String>,
    disasters: &[DisasterRef],
    disaster_words: fn(&DisasterRef) -> HashSet<String>,
) -> Option<Uuid> {
    if words.is_empty() {
        return None;
    }

    let mut best: Option<(usize, Uuid)> = None;
    for disaster in disasters {
        let overlap = disaster_words(disaster).intersection(words).count();
        if overlap > 0 && best.map_or(true, |(score, _)| overlap > score) {
            best = Some((overlap, disaster.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Nearest disaster within `radius_km` of `point`
pub fn match_by_distance(
    point: &Coordinates,
    disasters: &[DisasterRef],
    radius_km: f64,
) -> Option<Uuid> {
    let radius_m = radius_km * 1000.0;
    disasters
        .iter()
        .filter_map(|d| d.coordinates.map(|c| (d.id, c.distance_to(point))))
        .filter(|(_, distance)| *distance <= radius_m)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flood() -> DisasterRef {
        DisasterRef {
            id: Uuid::new_v4(),
            title: "NYC Flood".into(),
            location_name: "Manhattan, NYC".into(),
            tags: vec!["flood".into(), "urgent".into()],
            coordinates: Some(Coordinates::new(40.7831, -73.9712)),
        }
    }

    fn fire() -> DisasterRef {
        DisasterRef {
            id: Uuid::new_v4(),
            title: "Wildfire".into(),
            location_name: "Paradise, California".into(),
            tags: vec!["wildfire".into()],
            coordinates: Some(Coordinates::new(39.7596, -121.6219)),
        }
    }

    #[test]
    fn test_keywords_drop_short_and_stopwords() {
        let words = keywords("The flood in NYC is over, near Main St!");
        assert!(words.contains("flood"));
        assert!(words.contains("nyc"));
        assert!(words.contains("main"));
        assert!(!words.contains("the"));
        assert!(!words.contains("in"));
        assert!(!words.contains("near"));
    }

    #[test]
    fn test_match_by_keywords_picks_best_overlap() {
        let disasters = vec![fire(), flood()];
        let id = match_by_keywords("Flood waters rising in Manhattan #NYC", &disasters);
        assert_eq!(id, Some(disasters[1].id));
        assert!(match_by_keywords("Lovely weather today", &disasters).is_none());
    }

    #[test]
    fn test_match_by_location() {
        let disasters = vec![flood(), fire()];
        assert_eq!(
            match_by_location("Butte County, California", &disasters),
            Some(disasters[1].id)
        );
        assert!(match_by_location("Harris County, Texas", &disasters).is_none());
    }

    #[test]
    fn test_match_by_distance_respects_radius() {
        let disasters = vec![flood(), fire()];
        let brooklyn = Coordinates::new(40.6782, -73.9442);
        assert_eq!(
            match_by_distance(&brooklyn, &disasters, 100.0),
            Some(disasters[0].id)
        );
        let chicago = Coordinates::new(41.8781, -87.6298);
        assert!(match_by_distance(&chicago, &disasters, 100.0).is_none());
    }
}
