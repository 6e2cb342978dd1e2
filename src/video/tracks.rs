use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::errors::ContentError;
use crate::video::url::VideoId;

/// Non-greedy: stops at the first `]`, which is enough for the flat track
/// objects the watch page embeds. Anything smarter belongs behind
/// [`parse_caption_tracks`], not in its callers.
static CAPTION_TRACKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"captionTracks":\s*(\[.*?\])"#).unwrap());

/// One subtitle stream offered for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "languageCode")]
    pub language_code: String,
    #[serde(rename = "baseUrl")]
    pub track_url: String,
}

impl CaptionTrack {
    pub fn new(language_code: impl Into<String>, track_url: impl Into<String>) -> Self {
        Self {
            language_code: language_code.into(),
            track_url: track_url.into(),
        }
    }
}

/// The caption track list embedded in a watch page, in page order.
///
/// A page with no `captionTracks` literal has no captions to offer; a literal
/// that doesn't parse is a fetch failure.
pub fn parse_caption_tracks(html: &str, video: &VideoId) -> Result<Vec<CaptionTrack>, ContentError> {
    let Some(literal) = CAPTION_TRACKS
        .captures(html)
        .and_then(|caps| caps.get(1))
    else {
        return Err(ContentError::NoCaptionsAvailable(video.to_string()));
    };

    serde_json::from_str(literal.as_str())
        .map_err(|e| ContentError::FetchFailed(format!("unreadable caption track list: {e}")))
}

/// English if any track offers it, otherwise the first track.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    video: &VideoId,
) -> Result<&'a CaptionTrack, ContentError> {
    tracks
        .iter()
        .find(|track| track.language_code == "en")
        .or_else(|| tracks.first())
        .ok_or_else(|| ContentError::NoCaptionsAvailable(video.to_string()))
}
