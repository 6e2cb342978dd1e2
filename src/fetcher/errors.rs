use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("dns failure: {0}")]
    Dns(String),

    #[error("tls error: {0}")]
    Tls(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("too many redirects")]
    RedirectLoop,

    /// The server answered 403: it recognised and refused an automated client.
    #[error("access blocked by {host}")]
    Blocked { host: String },

    #[error("http error {status}")]
    Http {
        status: reqwest::StatusCode,
        retriable: bool,
    },

    #[error("body too large ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl FetchError {
    pub fn should_retry(&self) -> bool {
        match self {
            // Fatal errors - don't retry
            Self::InvalidUrl(_) => false,
            Self::Blocked { .. } => false,
            Self::BodyTooLarge(_) => false,
            Self::UnsupportedContentType(_) => false,
            Self::Http { retriable, .. } => *retriable,

            // Temporary errors - retry
            Self::Dns(_) => true,
            Self::Tls(_) => true,
            Self::ConnectTimeout => true,
            Self::RequestTimeout => true,
            Self::RedirectLoop => true,
            Self::Io(_) => true,
            Self::Unknown(_) => true,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if err.is_redirect() {
            Self::RedirectLoop
        } else if let Some(status) = err.status() {
            Self::from_status(status, err.url().and_then(|u| u.host_str()).unwrap_or(""))
        } else if err.is_request() || err.is_connect() {
            // DNS, connection errors
            Self::Dns(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, host: &str) -> Self {
        if status == reqwest::StatusCode::FORBIDDEN {
            Self::Blocked {
                host: host.to_string(),
            }
        } else {
            Self::Http {
                status,
                retriable: status.is_server_error(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_forbidden_maps_to_blocked() {
        let err = FetchError::from_status(StatusCode::FORBIDDEN, "example.com");
        assert!(err.is_blocked());
        assert!(!err.should_retry());
        assert_eq!(err.to_string(), "access blocked by example.com");
    }

    #[test]
    fn test_other_statuses_stay_http() {
        let err = FetchError::from_status(StatusCode::BAD_GATEWAY, "example.com");
        assert!(matches!(
            err,
            FetchError::Http {
                retriable: true,
                ..
            }
        ));

        let err = FetchError::from_status(StatusCode::NOT_FOUND, "example.com");
        assert!(!err.should_retry());
        assert!(!err.is_blocked());
    }
}
