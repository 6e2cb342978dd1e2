use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::ContentError;
use crate::fetcher::{FetchOptions, fetch_with, post_json};
use crate::video::timedtext::{decode_caption_entities, parse_timed_text};
use crate::video::tracks::{CaptionTrack, select_track};
use crate::video::url::VideoId;

/// One caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFragment {
    pub text: String,
    pub start: Option<f64>,
    pub duration: Option<f64>,
}

impl CaptionFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// Anything that can list a video's caption cues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionsLookup: Send + Sync {
    async fn lookup(&self, video: &VideoId) -> Result<Vec<CaptionFragment>, ContentError>;
}

const ANDROID_CLIENT_NAME: &str = "ANDROID";
const ANDROID_CLIENT_VERSION: &str = "20.10.38";

/// Captions via the InnerTube player endpoint, posing as the Android app.
#[derive(Debug, Clone)]
pub struct InnertubeCaptions {
    origin: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<PlayerCaptions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerCaptions {
    player_captions_tracklist_renderer: Option<Tracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tracklist {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

impl InnertubeCaptions {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    fn player_url(&self) -> String {
        format!("{}/youtubei/v1/player?prettyPrint=false", self.origin)
    }
}

#[async_trait]
impl CaptionsLookup for InnertubeCaptions {
    #[instrument(skip(self), fields(video = %video))]
    async fn lookup(&self, video: &VideoId) -> Result<Vec<CaptionFragment>, ContentError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": ANDROID_CLIENT_NAME,
                    "clientVersion": ANDROID_CLIENT_VERSION,
                    "hl": "en"
                }
            },
            "videoId": video.as_str()
        });

        let player = post_json(&self.player_url(), &body, &FetchOptions::english()).await?;
        let response: PlayerResponse = serde_json::from_str(&player.body_utf8)
            .map_err(|e| ContentError::FetchFailed(format!("unreadable player response: {e}")))?;

        if let Some(PlayabilityStatus {
            status: Some(status),
            reason,
        }) = &response.playability_status
            && status != "OK"
        {
            debug!(%status, reason = reason.as_deref().unwrap_or(""), "video not playable");
        }

        let tracks = response
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .map(|t| t.caption_tracks)
            .unwrap_or_default();
        let track = select_track(&tracks, video)?;
        debug!(language = %track.language_code, "selected caption track");

        // srv3 is a different document shape; the default format is <text> cues
        let track_url = track.track_url.replace("&fmt=srv3", "");
        let captions = fetch_with(
            &track_url,
            &FetchOptions::english().with_cookies(player.cookies.clone()),
        )
        .await?;

        Ok(parse_timed_text(&captions.body_utf8)
            .into_iter()
            .map(|fragment| CaptionFragment {
                text: decode_caption_entities(&fragment.text).trim().to_string(),
                ..fragment
            })
            .filter(|fragment| !fragment.text.is_empty())
            .collect())
    }
}
