use std::fs;

use crate::extractor::{WEBSITE_CHAR_LIMIT, extract_text};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article() {
    let content = extract_text(&fixture("article.html"));
    let text = content.as_str();

    assert!(text.contains("Sample Article About Urban Gardening"));
    assert!(text.contains("first paragraph of the article"));
    assert!(text.contains("second paragraph, which explains"));
    assert!(text.contains("Why cities are turning green"));
    assert!(text.contains("Lower summer temperatures on the street"));
    assert!(!content.is_truncated());
}

#[test]
fn test_article_boilerplate_never_leaks() {
    let content = extract_text(&fixture("article.html"));
    let text = content.as_str();

    // nav, footer, ads, script and style
    assert!(!text.contains("World news coverage"));
    assert!(!text.contains("Copyright 2024"));
    assert!(!text.contains("Sponsored"));
    assert!(!text.contains("Advertisement text"));
    assert!(!text.contains("dataLayer"));
    assert!(!text.contains("font-family"));
}

#[test]
fn test_article_drops_short_blocks() {
    let content = extract_text(&fixture("article.html"));

    for line in content.as_str().lines() {
        assert!(line.chars().count() > 20, "short block leaked: {line:?}");
    }
    assert!(!content.as_str().contains("By Staff"));
    assert!(!content.as_str().contains("Getting started"));
    assert!(!content.as_str().contains("Read more"));
}

#[test]
fn test_page_with_only_boilerplate_is_empty() {
    let content = extract_text(&fixture("empty.html"));
    assert!(content.is_empty());
}

#[test]
fn test_ceiling_applied_to_assembled_text() {
    let paragraph = format!("<p>{}</p>", "long paragraph text ".repeat(50));
    let html = format!("<html><body>{}</body></html>", paragraph.repeat(40));

    let content = extract_text(&html);
    assert_eq!(content.char_count(), WEBSITE_CHAR_LIMIT);
    assert!(content.is_truncated());
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed paragraph tags keep going<div>More";
    let content = extract_text(html);
    assert!(content.as_str().contains("Unclosed paragraph tags keep going"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics_and_stays_bounded(html in ".*") {
            let content = extract_text(&html);
            prop_assert!(content.char_count() <= WEBSITE_CHAR_LIMIT);
        }
    }
}
