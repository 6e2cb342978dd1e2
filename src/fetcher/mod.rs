pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{
    BROWSER_USER_AGENT, ENGLISH_LANGUAGE, FetchOptions, fetch, fetch_with, post_json,
};
pub use errors::FetchError;
pub use types::{PageResponse, SessionCookies};
