//! Where a request's material comes from, and how it becomes prompt text.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::Config;
use crate::errors::ContentError;
use crate::extractor::fetch_website_content;
use crate::video::{CaptionsLookup, InnertubeCaptions, TranscriptResolver};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentSource {
    /// Text the user pasted; used as-is.
    Text(String),
    /// A web page URL.
    Website(String),
    /// A video URL or bare video id.
    Video(String),
}

impl ContentSource {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Website(_) => "website",
            Self::Video(_) => "video",
        }
    }
}

/// Turns any [`ContentSource`] into prompt-ready text.
pub struct ContentAcquirer<L = InnertubeCaptions> {
    transcripts: TranscriptResolver<L>,
}

impl ContentAcquirer<InnertubeCaptions> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(TranscriptResolver::from_config(config))
    }
}

impl<L: CaptionsLookup> ContentAcquirer<L> {
    pub fn new(transcripts: TranscriptResolver<L>) -> Self {
        Self { transcripts }
    }

    #[instrument(skip_all, fields(kind = source.kind()))]
    pub async fn acquire(&self, source: &ContentSource) -> Result<String, ContentError> {
        match source {
            ContentSource::Text(text) => Ok(text.clone()),
            ContentSource::Website(url) => Ok(fetch_website_content(url).await?.into_string()),
            ContentSource::Video(reference) => Ok(self
                .transcripts
                .fetch_transcript(reference)
                .await?
                .into_string()),
        }
    }
}
