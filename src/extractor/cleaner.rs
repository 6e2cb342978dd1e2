use scraper::ElementRef;

/// Elements whose whole subtree is boilerplate.
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "footer", "noscript"];

/// Whether `element` starts a subtree that must never reach the excerpt:
/// scripts, styles, navigation, footers, and anything marked as an ad.
pub fn is_boilerplate(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if BOILERPLATE_TAGS.contains(&value.name()) {
        return true;
    }

    value.classes().any(is_ad_token)
        || value.id().is_some_and(is_ad_token)
        || value.attrs().any(|(name, _)| name.starts_with("data-ad"))
}

/// True if `element` or any of its ancestors is boilerplate.
pub fn inside_boilerplate(element: ElementRef<'_>) -> bool {
    is_boilerplate(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(is_boilerplate)
}

/// Text content of `element`, skipping any boilerplate subtrees nested inside it.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_boilerplate(child_element) {
                collect_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

/// `ad`, `ads`, `ad-slot`, `sidebar-ad`, `advertisement`, `advert-banner`, ...
/// but not `add-to-cart`, `header` or `read`.
fn is_ad_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    token
        .split(['-', '_'])
        .any(|part| matches!(part, "ad" | "ads" | "advert" | "adsbygoogle"))
        || token.contains("advertisement")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_ad_tokens() {
        assert!(is_ad_token("ad"));
        assert!(is_ad_token("ad-slot"));
        assert!(is_ad_token("sidebar_ads"));
        assert!(is_ad_token("Advertisement"));
        assert!(is_ad_token("adsbygoogle"));
        assert!(!is_ad_token("add-to-cart"));
        assert!(!is_ad_token("header"));
        assert!(!is_ad_token("shadow"));
    }

    #[test]
    fn test_paragraph_inside_footer_is_boilerplate() {
        let document = Html::parse_document(
            "<html><body><footer><p>Copyright 2024 Example Incorporated</p></footer></body></html>",
        );
        assert!(inside_boilerplate(first(&document, "p")));
    }

    #[test]
    fn test_ad_marked_container_is_boilerplate() {
        let document = Html::parse_document(
            r#"<div class="promo ad-banner"><p>Buy now and save forty percent today</p></div>"#,
        );
        assert!(inside_boilerplate(first(&document, "p")));

        let document = Html::parse_document(
            r#"<div data-ad-slot="123"><p>Sponsored content that should vanish</p></div>"#,
        );
        assert!(inside_boilerplate(first(&document, "p")));
    }

    #[test]
    fn test_visible_text_skips_nested_script() {
        let document = Html::parse_document(
            "<p>Before the script <script>var tracking = true;</script>and after it</p>",
        );
        let text = visible_text(first(&document, "p"));
        assert_eq!(text, "Before the script and after it");
    }
}
