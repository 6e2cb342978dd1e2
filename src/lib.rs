//! Content acquisition and generation pipeline.
//!
//! Turns raw text, web pages and video transcripts into bounded prompt text,
//! calls a generation engine with retry on rate limiting and overload, and
//! splits free-form responses into a fixed number of candidates.

pub mod config;
pub mod errors;
pub mod extractor;
pub mod fetcher;
pub mod generation;
pub mod source;
pub mod video;

pub use errors::ContentError;
pub use extractor::{ExtractedContent, fetch_website_content};
pub use generation::{invoke_with_retry, parse_candidates};
pub use source::{ContentAcquirer, ContentSource};
pub use video::{TranscriptResolver, resolve_video_id};
