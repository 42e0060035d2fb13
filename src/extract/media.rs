//! Hero image URL resolution.
//!
//! Hero `<img>` tags carry a `data-interchange` attribute shaped like
//!
//! ```text
//! [https://cdn.example.com/photo-480px.jpg, small], [https://cdn.example.com/photo-960px.jpg, large]
//! ```
//!
//! (sometimes with the URLs quoted). Only the first pair is used. Its URL
//! must contain a `-<digits>px` width token, which is rewritten to the
//! configured canonical width so every species gets the same resolution.
//! Nothing here touches the network; downloads happen at serialization.

use crate::error::ScrapeError;
use crate::extract::fragments;
use crate::extract::rules::{Applied, RuleOutcome};
use crate::models::SpeciesRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::warn;

/// Attribute holding the responsive-source list.
pub const SOURCE_ATTR: &str = "data-interchange";

static WIDTH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-(\d+)px").unwrap_or_else(|e| panic!("invalid width regex: {e}")));

/// Pull the URL out of the first `"url", breakpoint` pair.
pub fn first_source_url(attr: &str) -> Option<String> {
    let inner = attr.trim().trim_matches(|c: char| c == '[' || c == ']');
    let url = inner.split(',').next()?.trim().trim_matches('"').trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Rewrite every width token in `url` to `-<width>px`.
///
/// # Errors
///
/// [`ScrapeError::ImageFormat`] when `url` has no width token at all.
pub fn canonical_image_url(url: &str, width: u32) -> Result<String, ScrapeError> {
    if !WIDTH_TOKEN.is_match(url) {
        return Err(ScrapeError::ImageFormat {
            url: url.to_string(),
        });
    }
    Ok(WIDTH_TOKEN
        .replace_all(url, format!("-{width}px").as_str())
        .into_owned())
}

/// Resolve every hero image to its canonical high-resolution URL.
///
/// A single image without a width token fails the whole rule with
/// [`RuleOutcome::FormatViolation`] and leaves `image_urls` unset. Images
/// without the source attribute are skipped. A hero with no usable image
/// leaves the field unset.
pub fn resolve_images(document: &Html, mut record: SpeciesRecord, width: u32) -> Applied {
    let Some(hero) = fragments::hero(document) else {
        return Applied::missing(record, "hero");
    };

    let mut urls = Vec::new();
    for img in fragments::images(hero) {
        let Some(raw) = img.value().attr(SOURCE_ATTR).and_then(first_source_url) else {
            warn!(species = %record.species_name, "Hero image without data-interchange; skipping");
            continue;
        };
        match canonical_image_url(&raw, width) {
            Ok(url) => urls.push(url),
            Err(e) => {
                return Applied {
                    record,
                    outcome: RuleOutcome::FormatViolation(e.to_string()),
                };
            }
        }
    }

    if urls.is_empty() {
        return Applied::missing(record, "hero image");
    }
    record.image_urls = Some(urls);
    Applied::ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero_page(attrs: &[&str]) -> Html {
        let imgs: String = attrs
            .iter()
            .map(|a| format!(r#"<img data-interchange='{a}'>"#))
            .collect();
        Html::parse_document(&format!(r#"<div class="hero">{imgs}</div>"#))
    }

    #[test]
    fn test_first_source_url_handles_quotes_and_brackets() {
        assert_eq!(
            first_source_url(r#"["https://cdn.example.com/a-480px.jpg", small], ["https://cdn.example.com/a-960px.jpg", large]"#)
                .as_deref(),
            Some("https://cdn.example.com/a-480px.jpg")
        );
        assert_eq!(
            first_source_url("[https://cdn.example.com/b-240px.jpg, small]").as_deref(),
            Some("https://cdn.example.com/b-240px.jpg")
        );
        assert_eq!(first_source_url("[]"), None);
    }

    #[test]
    fn test_canonical_image_url_rewrites_width_only() {
        assert_eq!(
            canonical_image_url("https://cdn.example.com/photo-480px.jpg", 720).unwrap(),
            "https://cdn.example.com/photo-720px.jpg"
        );
        assert_eq!(
            canonical_image_url("https://cdn.example.com/wood-duck-2-1280px.jpg", 720).unwrap(),
            "https://cdn.example.com/wood-duck-2-720px.jpg"
        );
    }

    #[test]
    fn test_canonical_image_url_rejects_missing_token() {
        match canonical_image_url("https://cdn.example.com/photo.jpg", 720) {
            Err(ScrapeError::ImageFormat { url }) => {
                assert_eq!(url, "https://cdn.example.com/photo.jpg")
            }
            other => panic!("expected ImageFormat, got {other:?}"),
        }
        assert!(canonical_image_url("https://cdn.example.com/photo-px.jpg", 720).is_err());
    }

    #[test]
    fn test_resolve_images_rewrites_all() {
        let doc = hero_page(&[
            r#"["https://cdn.example.com/one-480px.jpg", small]"#,
            r#"["https://cdn.example.com/two-320px.jpg", small]"#,
        ]);
        let out = resolve_images(&doc, SpeciesRecord::default(), 720);
        assert!(out.outcome.is_applied());
        assert_eq!(
            out.record.image_urls.unwrap(),
            vec![
                "https://cdn.example.com/one-720px.jpg",
                "https://cdn.example.com/two-720px.jpg"
            ]
        );
    }

    #[test]
    fn test_one_bad_url_fails_whole_rule() {
        let doc = hero_page(&[
            r#"["https://cdn.example.com/one-480px.jpg", small]"#,
            r#"["https://cdn.example.com/two.jpg", small]"#,
        ]);
        let out = resolve_images(&doc, SpeciesRecord::default(), 720);
        assert!(matches!(out.outcome, RuleOutcome::FormatViolation(_)));
        assert!(out.record.image_urls.is_none());
    }

    #[test]
    fn test_images_without_attribute_are_skipped() {
        let doc = Html::parse_document(
            r#"<div class="hero"><img src="x.jpg"><img data-interchange='["https://c.test/a-100px.jpg", small]'></div>"#,
        );
        let out = resolve_images(&doc, SpeciesRecord::default(), 720);
        assert_eq!(out.record.image_urls.unwrap(), vec!["https://c.test/a-720px.jpg"]);
    }

    #[test]
    fn test_missing_hero_is_not_found() {
        let doc = Html::parse_document("<div class='other'></div>");
        let out = resolve_images(&doc, SpeciesRecord::default(), 720);
        assert_eq!(out.outcome, RuleOutcome::NotFound("hero"));
    }
}
