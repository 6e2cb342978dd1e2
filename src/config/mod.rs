//! Runtime configuration for the acquisition and generation pipeline.
//!
//! Everything is read from environment variables with development defaults,
//! so a bare `Config::from_env()` works on a laptop. Only the generation
//! engine key has no default.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::generation::RetryPolicy;

pub const ENV_YOUTUBE_BASE_URL: &str = "HARVEST_YOUTUBE_BASE_URL";
pub const ENV_GENERATION_RETRIES: &str = "HARVEST_GENERATION_RETRIES";
pub const ENV_GENERATION_BASE_DELAY_MS: &str = "HARVEST_GENERATION_BASE_DELAY_MS";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "HARVEST_GEMINI_MODEL";
pub const ENV_GEMINI_BASE_URL: &str = "HARVEST_GEMINI_BASE_URL";

const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const DEFAULT_GENERATION_RETRIES: u32 = 3;
const DEFAULT_GENERATION_BASE_DELAY_MS: u64 = 2000;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    youtube_base_url: String,
    generation_retries: u32,
    generation_base_delay_ms: u64,
    gemini_api_key: Option<String>,
    gemini_model: String,
    gemini_base_url: String,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            youtube_base_url: string_var(ENV_YOUTUBE_BASE_URL, DEFAULT_YOUTUBE_BASE_URL),
            generation_retries: parsed_var(
                ENV_GENERATION_RETRIES,
                "generation_retries",
                DEFAULT_GENERATION_RETRIES,
            )?,
            generation_base_delay_ms: parsed_var(
                ENV_GENERATION_BASE_DELAY_MS,
                "generation_base_delay_ms",
                DEFAULT_GENERATION_BASE_DELAY_MS,
            )?,
            gemini_api_key: env::var(ENV_GEMINI_API_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_model: string_var(ENV_GEMINI_MODEL, DEFAULT_GEMINI_MODEL),
            gemini_base_url: string_var(ENV_GEMINI_BASE_URL, DEFAULT_GEMINI_BASE_URL),
        })
    }

    /// Origin for watch pages and the InnerTube API.
    pub fn youtube_base_url(&self) -> &str {
        &self.youtube_base_url
    }

    pub fn generation_retries(&self) -> u32 {
        self.generation_retries
    }

    pub fn generation_base_delay(&self) -> Duration {
        Duration::from_millis(self.generation_base_delay_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.generation_retries, self.generation_base_delay())
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    pub fn gemini_model(&self) -> &str {
        &self.gemini_model
    }

    pub fn gemini_base_url(&self) -> &str {
        &self.gemini_base_url
    }

    pub fn with_youtube_base_url(mut self, url: impl Into<String>) -> Self {
        self.youtube_base_url = url.into();
        self
    }

    pub fn with_gemini(mut self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.gemini_api_key = Some(api_key.into());
        self.gemini_base_url = base_url.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            generation_retries: DEFAULT_GENERATION_RETRIES,
            generation_base_delay_ms: DEFAULT_GENERATION_BASE_DELAY_MS,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

fn string_var(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed_var<T>(key: &str, field: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    field,
                    reason: format!("{raw:?}: {e}"),
                })
        }
        _ => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_YOUTUBE_BASE_URL,
            ENV_GENERATION_RETRIES,
            ENV_GENERATION_BASE_DELAY_MS,
            ENV_GEMINI_API_KEY,
            ENV_GEMINI_MODEL,
            ENV_GEMINI_BASE_URL,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.youtube_base_url(), DEFAULT_YOUTUBE_BASE_URL);
        assert_eq!(cfg.retry_policy(), RetryPolicy::default());
        assert_eq!(cfg.gemini_api_key(), None);
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_YOUTUBE_BASE_URL, "http://127.0.0.1:8080");
            env::set_var(ENV_GENERATION_RETRIES, "5");
            env::set_var(ENV_GENERATION_BASE_DELAY_MS, "250");
            env::set_var(ENV_GEMINI_API_KEY, "test-key");
            env::set_var(ENV_GEMINI_MODEL, "gemini-1.5-pro");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.youtube_base_url(), "http://127.0.0.1:8080");
        assert_eq!(cfg.generation_retries(), 5);
        assert_eq!(cfg.generation_base_delay(), Duration::from_millis(250));
        assert_eq!(cfg.gemini_api_key(), Some("test-key"));
        assert_eq!(cfg.gemini_model(), "gemini-1.5-pro");
        assert_eq!(cfg.gemini_base_url(), DEFAULT_GEMINI_BASE_URL);
        clear_env();
    }

    #[test]
    fn invalid_number_is_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_GENERATION_RETRIES, "three");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("generation_retries"));
        clear_env();
    }
}
