//! Failure taxonomy for content acquisition.
//!
//! Callers are expected to branch on the variant: `AccessBlocked` means "ask
//! the user to paste the content", `TranscriptUnavailable` and
//! `NoCaptionsAvailable` mean "this source has nothing usable", and
//! `FetchFailed` is an ordinary network or parse fault.

use thiserror::Error;

use crate::fetcher::FetchError;

pub const ACCESS_BLOCKED_GUIDANCE: &str = "This website blocks automated access. Copy the page text and submit it as manual content instead.";

pub const TRANSCRIPT_UNAVAILABLE_GUIDANCE: &str = "Automated transcript access was blocked or no captions could be read. Paste the video transcript manually instead.";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{guidance} ({0})", guidance = ACCESS_BLOCKED_GUIDANCE)]
    AccessBlocked(String),

    #[error("failed to fetch content: {0}")]
    FetchFailed(String),

    #[error("{guidance} (video {0})", guidance = TRANSCRIPT_UNAVAILABLE_GUIDANCE)]
    TranscriptUnavailable(String),

    #[error("no caption tracks available for video {0}")]
    NoCaptionsAvailable(String),
}

impl ContentError {
    /// True when the user should supply the content by hand.
    pub fn needs_manual_input(&self) -> bool {
        matches!(self, Self::AccessBlocked(_) | Self::TranscriptUnavailable(_))
    }
}

impl From<FetchError> for ContentError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Blocked { host } => Self::AccessBlocked(host),
            other => Self::FetchFailed(other.to_string()),
        }
    }
}
