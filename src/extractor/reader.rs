use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::extractor::cleaner::{inside_boilerplate, visible_text};

static BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, p, li").unwrap());

/// Blocks this short are menu labels, buttons and the like.
pub const MIN_BLOCK_CHARS: usize = 20;

/// Headings, paragraphs and list items in document order, one per line.
pub fn collect_blocks(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();

    for block in document.select(&BLOCK_SELECTOR) {
        if inside_boilerplate(block) {
            continue;
        }

        let text = visible_text(block);
        let text = text.trim();
        if text.chars().count() > MIN_BLOCK_CHARS {
            out.push_str(text);
            out.push('\n');
        }
    }

    out
}
