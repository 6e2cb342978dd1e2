pub mod cleaner;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use model::{ExtractedContent, TRANSCRIPT_CHAR_LIMIT, WEBSITE_CHAR_LIMIT};

use tracing::{info, instrument, warn};

use crate::errors::ContentError;
use crate::fetcher::fetch;

/// Fetch `url` with a browser user agent and reduce it to a bounded excerpt.
///
/// A 403 surfaces as [`ContentError::AccessBlocked`]; every other transport or
/// decoding failure is [`ContentError::FetchFailed`]. No retries happen here.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_website_content(url: &str) -> Result<ExtractedContent, ContentError> {
    let page = fetch(url).await.map_err(|err| {
        warn!(
            error = %err,
            blocked = err.is_blocked(),
            retriable = err.should_retry(),
            "website fetch failed"
        );
        ContentError::from(err)
    })?;

    let content = extract_text(&page.body_utf8);
    info!(
        chars = content.char_count(),
        truncated = content.is_truncated(),
        "extracted website content"
    );
    Ok(content)
}

/// Boilerplate-free block text of an HTML document, capped at [`WEBSITE_CHAR_LIMIT`].
pub fn extract_text(html: &str) -> ExtractedContent {
    ExtractedContent::bounded(reader::collect_blocks(html), WEBSITE_CHAR_LIMIT)
}
