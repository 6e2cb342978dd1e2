use reqwest::header::{HeaderMap, SET_COOKIE};
use url::Url;

/// Cookies a server handed out on one response, ready to be replayed as a
/// `Cookie` header on a follow-up request.
///
/// Always passed explicitly from the response that produced it to the request
/// that needs it; nothing here is stored process-wide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies(Option<String>);

impl SessionCookies {
    pub fn none() -> Self {
        Self(None)
    }

    /// Collect the `name=value` pairs of every `Set-Cookie` header, dropping
    /// attributes such as `Path` or `Expires`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pairs: Vec<&str> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('='))
            .collect();

        if pairs.is_empty() {
            Self(None)
        } else {
            Self(Some(pairs.join("; ")))
        }
    }

    pub fn header_value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// A successful fetch, decoded to UTF-8.
#[derive(Debug)]
pub struct PageResponse {
    /// Where the request ended up after redirects.
    pub url_final: Url,
    pub body_utf8: String,
    pub cookies: SessionCookies,
}
