//! Small string helpers shared by the extractors and the serializer.
//!
//! - Directory-name derivation for species
//! - Whitespace normalisation for text pulled out of the DOM
//! - String truncation for logging

use itertools::Itertools;
use scraper::ElementRef;

/// Derive the filesystem-safe directory name for a species.
///
/// Spaces become underscores and apostrophes are dropped, so
/// `"Barrow's Goldeneye"` maps to `"Barrows_Goldeneye"`. The function is
/// pure and idempotent: applying it to its own output changes nothing.
pub fn simplified_name(species_name: &str) -> String {
    species_name.replace(' ', "_").replace('\'', "")
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().join(" ")
}

/// All text beneath `element`, whitespace-normalised.
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (backed off to a char boundary) with
/// an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_simplified_name_replaces_spaces_and_drops_apostrophes() {
        assert_eq!(simplified_name("Wood Duck"), "Wood_Duck");
        assert_eq!(simplified_name("Barrow's Goldeneye"), "Barrows_Goldeneye");
        assert_eq!(simplified_name("Mallard"), "Mallard");
    }

    #[test]
    fn test_simplified_name_is_idempotent() {
        for name in ["Wood Duck", "Barrow's Goldeneye", "Black-bellied Whistling-Duck"] {
            let once = simplified_name(name);
            assert_eq!(simplified_name(&once), once);
        }
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Order:\n   Anseriformes \t"), "Order: Anseriformes");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_element_text_joins_nested_nodes() {
        let html = Html::parse_fragment("<p>The <a href='#'>Mallard</a>\n is   common.</p>");
        let p = Selector::parse("p").unwrap();
        let el = html.select(&p).next().unwrap();
        assert_eq!(element_text(el), "The Mallard is common.");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let s = "ééééé";
        let result = truncate_for_log(s, 3);
        assert!(result.starts_with('é'));
        assert!(result.contains("(+8 bytes)"));
    }
}
