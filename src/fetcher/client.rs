use crate::fetcher::{
    errors::FetchError,
    pipeline::process_response,
    types::{PageResponse, SessionCookies},
};
use once_cell::sync::Lazy;
use reqwest::{
    Client, ClientBuilder, RequestBuilder,
    header::{ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue},
};
use std::time::Duration;
use tracing::{debug, instrument};

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB

/// Sites that turn away non-browser clients get the same UA string a desktop
/// Chrome would send.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

pub const ENGLISH_LANGUAGE: &str = "en-US,en;q=0.9";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(BROWSER_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                HeaderValue::from_static(
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                ),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

/// Per-request header additions on top of the client defaults.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub accept_language: Option<&'static str>,
    pub cookies: SessionCookies,
}

impl FetchOptions {
    pub fn english() -> Self {
        Self {
            accept_language: Some(ENGLISH_LANGUAGE),
            cookies: SessionCookies::none(),
        }
    }

    pub fn with_cookies(mut self, cookies: SessionCookies) -> Self {
        self.cookies = cookies;
        self
    }

    fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(lang) = self.accept_language {
            request = request.header(ACCEPT_LANGUAGE, lang);
        }
        if let Some(cookie) = self.cookies.header_value() {
            request = request.header(COOKIE, cookie);
        }
        request
    }
}

pub async fn fetch(url: &str) -> Result<PageResponse, FetchError> {
    fetch_with(url, &FetchOptions::default()).await
}

#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_with(url: &str, options: &FetchOptions) -> Result<PageResponse, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let request = options.apply(HTTP_CLIENT.get(parsed_url));
    send(request).await
}

#[instrument(skip_all, fields(url = %url))]
pub async fn post_json(
    url: &str,
    body: &serde_json::Value,
    options: &FetchOptions,
) -> Result<PageResponse, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let request = options.apply(HTTP_CLIENT.post(parsed_url).json(body));
    send(request).await
}

async fn send(request: RequestBuilder) -> Result<PageResponse, FetchError> {
    let response = request
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        debug!(%status, "non-success response");
        return Err(FetchError::from_status(
            status,
            final_url.host_str().unwrap_or(""),
        ));
    }

    let content_type = headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !is_textual(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Check body size after download (in case Content-Length was missing)
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    Ok(process_response(
        final_url,
        &headers,
        &body_bytes,
        &content_type,
    ))
}

/// Pages, caption XML and JSON API bodies all pass; media and archives do not.
fn is_textual(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.starts_with("text/")
        || ct.contains("html")
        || ct.contains("xml")
        || ct.contains("json")
        || ct.contains("javascript")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_content_types() {
        assert!(is_textual("text/html; charset=utf-8"));
        assert!(is_textual("text/xml"));
        assert!(is_textual("application/xhtml+xml"));
        assert!(is_textual("application/json; charset=UTF-8"));
        assert!(!is_textual("image/jpeg"));
        assert!(!is_textual("application/octet-stream"));
    }
}
