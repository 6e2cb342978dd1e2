use async_trait::async_trait;
use thiserror::Error;

/// Binary input sent alongside a prompt, e.g. an audio clip to transcribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Generation engine errors.
///
/// The rendered message of the rate-limit and overload variants carries the
/// status text the retry wrapper looks for.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("429 Too Many Requests: {0}")]
    RateLimited(String),

    #[error("503 Overloaded: {0}")]
    Overloaded(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl EngineError {
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => Self::RateLimited(message),
            503 => Self::Overloaded(message),
            _ => Self::Api { status, message },
        }
    }

    /// Network failures are described without the request URL, whose host or
    /// port could otherwise contain a status-like number.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        Self::Network(err.without_url().to_string())
    }
}

/// Submit a prompt (plus optional attachment), get text back.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    async fn invoke(
        &self,
        prompt: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            EngineError::from_status(429, "quota"),
            EngineError::RateLimited(_)
        ));
        assert!(matches!(
            EngineError::from_status(503, "busy"),
            EngineError::Overloaded(_)
        ));
        assert!(matches!(
            EngineError::from_status(400, "bad"),
            EngineError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_messages_carry_status_text() {
        assert_eq!(
            EngineError::from_status(429, "quota exhausted").to_string(),
            "429 Too Many Requests: quota exhausted"
        );
        assert_eq!(
            EngineError::from_status(503, "model busy").to_string(),
            "503 Overloaded: model busy"
        );
    }
}
