// ABOUTME: Fetches the navigation fragment with a bounded timeout and decodes the body.
// ABOUTME: Charset comes from the Content-Type header, falling back to detection.

use bytes::Bytes;
use url::Url;

use crate::error::DecorateError;

/// Maximum accepted fragment size (2 MB).
pub const MAX_CONTENT_LENGTH: usize = 2 * 1024 * 1024;

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchResult {
    /// Decode the body as text using the response charset.
    pub fn text(&self) -> String {
        decode_body(&self.body, self.content_type.as_deref())
    }
}

/// Joins `path` onto `origin`, e.g. `https://site` + `/nav.plain.html`.
pub fn resolve(origin: &str, path: &str) -> Result<Url, DecorateError> {
    let base = Url::parse(origin).map_err(|e| {
        DecorateError::invalid_url(origin, "Resolve", Some(anyhow::anyhow!("invalid origin: {}", e)))
    })?;
    base.join(path).map_err(|e| {
        DecorateError::invalid_url(path, "Resolve", Some(anyhow::anyhow!("invalid path: {}", e)))
    })
}

/// Decode body bytes to a String using charset from content-type header or detection.
fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    if let Some(ct) = content_type {
        if let Some(charset) = extract_charset(ct) {
            if let Some(encoding) = encoding_rs::Encoding::for_label(charset.as_bytes()) {
                let (decoded, _, _) = encoding.decode(body);
                return decoded.into_owned();
            }
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Extract charset value from Content-Type header.
fn extract_charset(content_type: &str) -> Option<String> {
    let lower = content_type.to_lowercase();
    lower.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("charset=")
            .map(|charset| charset.trim_matches('"').trim_matches('\'').to_string())
    })
}

/// Fetch a resource. Transport errors, timeouts and non-success statuses all fail.
pub async fn fetch(client: &reqwest::Client, url: &Url) -> Result<FetchResult, DecorateError> {
    let target = url.as_str();
    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            DecorateError::timeout(target, "Fetch", Some(anyhow::anyhow!("request timed out: {}", e)))
        } else {
            DecorateError::fetch(target, "Fetch", Some(anyhow::anyhow!("request failed: {}", e)))
        }
    })?;

    if let Some(len) = response.content_length() {
        if len as usize > MAX_CONTENT_LENGTH {
            return Err(DecorateError::fetch(
                target,
                "Fetch",
                Some(anyhow::anyhow!("content too large")),
            ));
        }
    }

    let status = response.status();
    if !status.is_success() {
        return Err(DecorateError::fetch(
            target,
            "Fetch",
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_lowercase());

    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            DecorateError::timeout(target, "Fetch", Some(anyhow::anyhow!("body timed out: {}", e)))
        } else {
            DecorateError::fetch(target, "Fetch", Some(anyhow::anyhow!("failed to read body: {}", e)))
        }
    })?;

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(DecorateError::fetch(
            target,
            "Fetch",
            Some(anyhow::anyhow!("content too large")),
        ));
    }

    Ok(FetchResult {
        status: status.as_u16(),
        url: target.to_string(),
        content_type,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_nav_path() {
        let url = resolve("https://www.bamboohr.com", "/nav.plain.html").unwrap();
        assert_eq!(url.as_str(), "https://www.bamboohr.com/nav.plain.html");
    }

    #[test]
    fn resolve_rejects_bad_origin() {
        let err = resolve("not a url", "/nav.plain.html").unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn charset_from_content_type() {
        assert_eq!(
            extract_charset("text/html; charset=\"ISO-8859-1\""),
            Some("iso-8859-1".to_string())
        );
        assert_eq!(extract_charset("text/html"), None);
    }

    #[test]
    fn decode_uses_declared_charset() {
        let body = [0x63, 0x61, 0x66, 0xe9];
        assert_eq!(decode_body(&body, Some("text/html; charset=iso-8859-1")), "café");
    }
}
