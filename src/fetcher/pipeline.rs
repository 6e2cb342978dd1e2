use crate::fetcher::types::{PageResponse, SessionCookies};
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::header::HeaderMap;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

/// Bytes of the body inspected for an in-document charset declaration.
const SNIFF_WINDOW: usize = 4096;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

/// `<meta charset=..>` and `<meta http-equiv="Content-Type" content="..; charset=..">`.
static META_CHARSETS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap(),
        Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap(),
    ]
});

/// Decode the body and pick up any cookies the server set.
///
/// Bytes that are invalid in the detected encoding become U+FFFD; one stray
/// byte never costs the rest of the page.
pub fn process_response(
    url_final: Url,
    headers: &HeaderMap,
    body_bytes: &[u8],
    content_type: &str,
) -> PageResponse {
    let encoding = detect_charset(content_type, body_bytes);
    let (decoded, encoding, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        warn!(
            url = %url_final,
            encoding = encoding.name(),
            "body had invalid byte sequences, replaced"
        );
    }

    PageResponse {
        url_final,
        body_utf8: decoded.into_owned(),
        cookies: SessionCookies::from_headers(headers),
    }
}

fn encoding_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Header declaration wins, then an in-document `<meta>`, then a statistical guess.
fn detect_charset(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = encoding_from(&HEADER_CHARSET, content_type) {
        return encoding;
    }

    let window = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    if let Some(encoding) = META_CHARSETS
        .iter()
        .find_map(|regex| encoding_from(regex, &head))
    {
        return encoding;
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, false);
    detector.guess(None, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &[u8], content_type: &str) -> PageResponse {
        process_response(
            Url::parse("https://example.com/page").unwrap(),
            &HeaderMap::new(),
            body,
            content_type,
        )
    }

    #[test]
    fn test_detect_charset_from_content_type() {
        let encoding = detect_charset("text/xml; charset=UTF-8", b"<transcript></transcript>");
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";
        // encoding_rs maps ISO-8859-1 onto its windows-1252 superset
        assert_eq!(detect_charset("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head></html>";
        assert_eq!(detect_charset("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_less_common_label_is_honoured() {
        // "мир" in KOI8-R
        let body = [0xCD, 0xC9, 0xD2];
        assert_eq!(detect_charset("text/html; charset=koi8-r", &body), encoding_rs::KOI8_R);
        assert_eq!(page(&body, "text/html; charset=koi8-r").body_utf8, "мир");
    }

    #[test]
    fn test_process_response_captures_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::SET_COOKIE,
            "CONSENT=YES+1; Path=/".parse().unwrap(),
        );

        let page = process_response(
            Url::parse("https://www.youtube.com/watch?v=abc").unwrap(),
            &headers,
            b"<html><body>ok</body></html>",
            "text/html; charset=utf-8",
        );

        assert_eq!(page.cookies.header_value(), Some("CONSENT=YES+1"));
        assert_eq!(page.body_utf8, "<html><body>ok</body></html>");
    }

    #[test]
    fn test_decode_latin1_body() {
        let body = [0x63, 0x61, 0x66, 0xE9]; // "café" in windows-1252
        assert_eq!(page(&body, "text/html; charset=windows-1252").body_utf8, "café");
    }

    #[test]
    fn test_stray_byte_is_replaced_not_fatal() {
        let body = b"<p>caf\xE9 au lait</p>";
        assert_eq!(
            page(body, "text/html; charset=utf-8").body_utf8,
            "<p>caf\u{FFFD} au lait</p>"
        );
    }
}
