use serde::{Deserialize, Serialize};
use std::fmt;

/// Ceiling for text pulled out of a web page.
pub const WEBSITE_CHAR_LIMIT: usize = 20_000;

/// Ceiling for a video transcript.
pub const TRANSCRIPT_CHAR_LIMIT: usize = 25_000;

/// Plain text ready to be embedded in a prompt.
///
/// The ceiling is applied once, after the text has been fully assembled, so
/// every producer truncates at the same final stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    text: String,
    truncated: bool,
}

impl ExtractedContent {
    pub fn bounded(text: impl Into<String>, limit: usize) -> Self {
        let mut text = text.into();
        let cut = truncate_index(&text, limit);
        let truncated = cut < text.len();
        text.truncate(cut);
        Self { text, truncated }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl AsRef<str> for ExtractedContent {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ExtractedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Byte offset of the end of the first `limit` characters.
fn truncate_index(text: &str, limit: usize) -> usize {
    text.char_indices()
        .nth(limit)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
