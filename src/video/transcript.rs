use std::fmt;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::errors::ContentError;
use crate::extractor::{ExtractedContent, TRANSCRIPT_CHAR_LIMIT};
use crate::fetcher::{FetchOptions, fetch_with};
use crate::video::captions::{CaptionsLookup, InnertubeCaptions};
use crate::video::timedtext::transcript_from_timed_text;
use crate::video::tracks::{parse_caption_tracks, select_track};
use crate::video::url::{VideoId, resolve_video_id};

/// Result of running one transcript tier.
#[derive(Debug)]
pub enum TierOutcome {
    Success(String),
    /// The tier ran without error but produced only whitespace.
    Empty,
    Failed(ContentError),
}

impl TierOutcome {
    fn from_result(result: Result<String, ContentError>) -> Self {
        match result {
            Ok(text) if text.trim().is_empty() => Self::Empty,
            Ok(text) => Self::Success(text),
            Err(err) => Self::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The captions-lookup capability.
    Lookup,
    /// Scrape the watch page's embedded track list, then fetch the track.
    WatchPage,
}

impl Tier {
    pub const ORDER: [Tier; 2] = [Tier::Lookup, Tier::WatchPage];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Lookup => f.write_str("lookup"),
            Tier::WatchPage => f.write_str("watch_page"),
        }
    }
}

/// Resolves a video reference to transcript text by trying each [`Tier`] in
/// order until one produces non-blank text.
pub struct TranscriptResolver<L = InnertubeCaptions> {
    lookup: L,
    origin: String,
}

impl TranscriptResolver<InnertubeCaptions> {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self::with_lookup(InnertubeCaptions::new(origin.clone()), origin)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.youtube_base_url())
    }
}

impl<L: CaptionsLookup> TranscriptResolver<L> {
    pub fn with_lookup(lookup: L, origin: impl Into<String>) -> Self {
        Self {
            lookup,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// Transcript for a video URL or bare id, capped at [`TRANSCRIPT_CHAR_LIMIT`].
    ///
    /// Each tier runs once. If none yields text the error is
    /// [`ContentError::TranscriptUnavailable`], whatever the tiers' own failures were.
    #[instrument(skip(self))]
    pub async fn fetch_transcript(&self, video_ref: &str) -> Result<ExtractedContent, ContentError> {
        let video = resolve_video_id(video_ref);

        for tier in Tier::ORDER {
            match self.run_tier(tier, &video).await {
                TierOutcome::Success(text) => {
                    let transcript = ExtractedContent::bounded(text, TRANSCRIPT_CHAR_LIMIT);
                    info!(
                        %video,
                        %tier,
                        chars = transcript.char_count(),
                        truncated = transcript.is_truncated(),
                        "resolved transcript"
                    );
                    return Ok(transcript);
                }
                TierOutcome::Empty => debug!(%video, %tier, "tier produced no text"),
                TierOutcome::Failed(err) => warn!(%video, %tier, error = %err, "tier failed"),
            }
        }

        Err(ContentError::TranscriptUnavailable(video.to_string()))
    }

    pub async fn run_tier(&self, tier: Tier, video: &VideoId) -> TierOutcome {
        let result = match tier {
            Tier::Lookup => self.lookup_tier(video).await,
            Tier::WatchPage => self.watch_page_tier(video).await,
        };
        TierOutcome::from_result(result)
    }

    async fn lookup_tier(&self, video: &VideoId) -> Result<String, ContentError> {
        let fragments = self.lookup.lookup(video).await?;
        Ok(fragments
            .into_iter()
            .map(|fragment| fragment.text)
            .collect::<Vec<_>>()
            .join(" "))
    }

    async fn watch_page_tier(&self, video: &VideoId) -> Result<String, ContentError> {
        let page = fetch_with(&video.watch_url(&self.origin), &FetchOptions::english()).await?;

        let tracks = parse_caption_tracks(&page.body_utf8, video)?;
        let track = select_track(&tracks, video)?;
        debug!(language = %track.language_code, cookies = !page.cookies.is_empty(), "fetching caption track");

        // Some deployments only serve the track to the session that loaded the page.
        let options = FetchOptions::english().with_cookies(page.cookies);
        let captions = fetch_with(&track.track_url, &options).await?;

        Ok(transcript_from_timed_text(&captions.body_utf8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::captions::{CaptionFragment, MockCaptionsLookup};

    // Nothing listens here, so the watch-page tier fails fast.
    const DEAD_ORIGIN: &str = "http://127.0.0.1:9";

    #[tokio::test]
    async fn test_lookup_tier_success_wins() {
        let mut lookup = MockCaptionsLookup::new();
        lookup
            .expect_lookup()
            .times(1)
            .returning(|_| Ok(vec![CaptionFragment::text("hello"), CaptionFragment::text("world")]));

        let resolver = TranscriptResolver::with_lookup(lookup, DEAD_ORIGIN);
        let transcript = resolver
            .fetch_transcript("https://youtu.be/abc123")
            .await
            .unwrap();

        assert_eq!(transcript.as_str(), "hello world");
    }

    #[tokio::test]
    async fn test_lookup_receives_resolved_id() {
        let mut lookup = MockCaptionsLookup::new();
        lookup
            .expect_lookup()
            .withf(|video| video.as_str() == "abc123")
            .returning(|_| Ok(vec![CaptionFragment::text("resolved")]));

        let resolver = TranscriptResolver::with_lookup(lookup, DEAD_ORIGIN);
        let transcript = resolver
            .fetch_transcript("https://www.youtube.com/watch?v=abc123&t=5")
            .await
            .unwrap();
        assert_eq!(transcript.as_str(), "resolved");
    }

    #[tokio::test]
    async fn test_blank_lookup_result_is_not_success() {
        let mut lookup = MockCaptionsLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Ok(vec![CaptionFragment::text("  "), CaptionFragment::text("")]));

        let resolver = TranscriptResolver::with_lookup(lookup, DEAD_ORIGIN);
        let outcome = resolver.run_tier(Tier::Lookup, &VideoId::new("abc123")).await;
        assert!(matches!(outcome, TierOutcome::Empty));
    }

    #[tokio::test]
    async fn test_all_tiers_failing_is_transcript_unavailable() {
        let mut lookup = MockCaptionsLookup::new();
        lookup
            .expect_lookup()
            .returning(|video| Err(ContentError::NoCaptionsAvailable(video.to_string())));

        let resolver = TranscriptResolver::with_lookup(lookup, DEAD_ORIGIN);
        let err = resolver.fetch_transcript("abc123").await.unwrap_err();

        assert!(matches!(err, ContentError::TranscriptUnavailable(ref id) if id == "abc123"));
        assert!(err.needs_manual_input());
    }

    #[tokio::test]
    async fn test_transcript_is_capped() {
        let mut lookup = MockCaptionsLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Ok(vec![CaptionFragment::text("word ".repeat(10_000))]));

        let resolver = TranscriptResolver::with_lookup(lookup, DEAD_ORIGIN);
        let transcript = resolver.fetch_transcript("abc123").await.unwrap();

        assert_eq!(transcript.char_count(), TRANSCRIPT_CHAR_LIMIT);
        assert!(transcript.is_truncated());
    }

    #[test]
    fn test_tier_outcome_classification() {
        assert!(matches!(
            TierOutcome::from_result(Ok("text".into())),
            TierOutcome::Success(_)
        ));
        assert!(matches!(
            TierOutcome::from_result(Ok(" \n\t".into())),
            TierOutcome::Empty
        ));
        assert!(matches!(
            TierOutcome::from_result(Err(ContentError::FetchFailed("boom".into()))),
            TierOutcome::Failed(_)
        ));
    }
}
