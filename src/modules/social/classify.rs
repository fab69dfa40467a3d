use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Node};

use crate::shared::types::Priority;

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"[ \t\x{A0}]+").unwrap();
    static ref URGENT_REGEX: Regex = Regex::new(
        r"(?i)\b(?:sos|trapped|emergenc(?:y|ies)|urgent(?:ly)?|help needed)\b"
    )
    .unwrap();
    static ref HIGH_REGEX: Regex = Regex::new(
        r"(?i)\b(?:injur(?:ed|y|ies)|evacuat(?:e|ed|es|ing|ion|ions)|missing|rescu(?:e|ed|es|ing))\b"
    )
    .unwrap();
    static ref MEDIUM_REGEX: Regex =
        Regex::new(r"(?i)\b(?:needs?|needed|shelters?|food|water)\b").unwrap();
}

/// Turn status HTML into plain text; paragraphs and line breaks become newlines
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(el) if matches!(el.name(), "p" | "br") => text.push('\n'),
            _ => {}
        }
    }

    WHITESPACE_REGEX
        .replace_all(&text, " ")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keyword triage; the highest matching level wins
pub fn classify_priority(text: &str) -> Priority {
    if URGENT_REGEX.is_match(text) {
        Priority::Urgent
    } else if HIGH_REGEX.is_match(text) {
        Priority::High
    } else if MEDIUM_REGEX.is_match(text) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let html = "<p>Flooding on <a href=\"x\">#Main</a> St &amp; 5th</p><p>Stay safe</p>";
        assert_eq!(strip_html(html), "Flooding on #Main St & 5th\nStay safe");
        assert_eq!(strip_html("line<br/>two"), "line\ntwo");
    }

    #[test]
    fn test_strip_html_decodes_numeric_entities() {
        assert_eq!(
            strip_html("<p>Families can&#x27;t cross &#8212; bridge out</p>"),
            "Families can't cross \u{2014} bridge out"
        );
        assert_eq!(strip_html("<p>Road&nbsp;closed</p>"), "Road closed");
    }

    #[test]
    fn test_strip_html_decodes_escaped_markup_once() {
        assert_eq!(
            strip_html("<p>use &amp;lt;b&amp;gt; tags</p>"),
            "use &lt;b&gt; tags"
        );
        assert_eq!(strip_html("<p>1 &lt; 2</p>"), "1 < 2");
    }

    #[test]
    fn test_priority_levels() {
        assert_eq!(classify_priority("SOS! Family trapped on roof"), Priority::Urgent);
        assert_eq!(classify_priority("Two people injured downtown"), Priority::High);
        assert_eq!(classify_priority("We need blankets at the shelter"), Priority::Medium);
        assert_eq!(classify_priority("Beautiful sunset after the storm"), Priority::Low);
    }

    #[test]
    fn test_highest_level_wins() {
        assert_eq!(
            classify_priority("Need food, also someone is missing, HELP NEEDED"),
            Priority::Urgent
        );
    }

    #[test]
    fn test_keywords_match_whole_words() {
        // "sos" inside another word is not an SOS
        assert_eq!(classify_priority("Ambrosos bakery reopened"), Priority::Low);
        assert_eq!(classify_priority("sose and soss"), Priority::Low);
        assert_eq!(classify_priority("Evacuated families rest"), Priority::High);
    }

    #[test]
    fn test_inflected_keywords() {
        assert_eq!(classify_priority("Supplies urgently required"), Priority::Urgent);
        assert_eq!(classify_priority("Residents evacuating the valley"), Priority::High);
        assert_eq!(classify_priority("Multiple injuries reported"), Priority::High);
        assert_eq!(classify_priority("Crews rescuing pets"), Priority::High);
        assert_eq!(classify_priority("Two shelters open tonight"), Priority::Medium);
    }
}
