//! Video references and transcript acquisition.

pub mod captions;
pub mod timedtext;
pub mod tracks;
pub mod transcript;
pub mod url;

pub use captions::{CaptionFragment, CaptionsLookup, InnertubeCaptions};
pub use tracks::{CaptionTrack, parse_caption_tracks, select_track};
pub use transcript::{Tier, TierOutcome, TranscriptResolver};
pub use self::url::{VideoId, resolve_video_id};
