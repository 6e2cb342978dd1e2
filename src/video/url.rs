use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static SHORTS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"shorts/([A-Za-z0-9_-]+)").unwrap());

static QUERY_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]v=([^&]+)").unwrap());

static SHORT_LINK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtu\.be/([^/?&#]+)").unwrap());

/// Identifier of one video, from which every URL the transcript tiers use is derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{origin}/watch?v={id}`
    pub fn watch_url(&self, origin: &str) -> String {
        format!("{}/watch?v={}", origin.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pull the video id out of a watch URL, a `youtu.be` short link, a shorts
/// link, or return the input as-is when it looks like none of those.
///
/// Never fails and never touches the network: a bad id is reported later by
/// whichever fetch uses it.
pub fn resolve_video_id(input: &str) -> VideoId {
    let input = input.trim();

    let captured = input
        .contains("shorts/")
        .then(|| capture(&SHORTS_ID, input))
        .flatten()
        .or_else(|| capture(&QUERY_ID, input))
        .or_else(|| capture(&SHORT_LINK_ID, input));

    VideoId::new(captured.unwrap_or(input))
}

fn capture<'a>(regex: &Regex, input: &'a str) -> Option<&'a str> {
    regex
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
