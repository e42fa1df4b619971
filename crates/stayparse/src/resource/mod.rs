// ABOUTME: HTTP collaborator used by sources to fetch listing pages and price API responses.
// ABOUTME: Maps transport failures to unsuccessful responses and decodes bodies using charset hints.

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::error::ParseError;
use crate::options::Options;

/// Maximum allowed content length (10 MB).
pub const MAX_CONTENT_LENGTH: usize = 10 * 1024 * 1024;

/// Outcome of a GET request.
///
/// `status` is `None` when the request never produced a response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: Option<u16>,
    pub text: String,
    pub json: Option<Value>,
}

impl HttpResponse {
    /// Builds a response, parsing the body as JSON when possible.
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let json = serde_json::from_str(&text).ok();
        Self {
            status: Some(status),
            text,
            json,
        }
    }

    /// A response standing for a request that never completed.
    pub fn failed() -> Self {
        Self::default()
    }

    /// Returns true for 2xx responses.
    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(code) if (200..300).contains(&code))
    }
}

/// Fetches text for a URL. Never fails: problems are reported through the response.
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str) -> HttpResponse;
}

/// Blocking HTTP client with a browser-like user agent and caching disabled.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::blocking::Client,
}

impl HttpClient {
    /// Build a client from the given options.
    pub fn new(opts: &Options) -> Result<Self, ParseError> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &opts.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ParseError::client("HttpClient", Some(anyhow::anyhow!("bad header name: {}", e)))
            })?;
            let value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                ParseError::client("HttpClient", Some(anyhow::anyhow!("bad header value: {}", e)))
            })?;
            headers.insert(name, value);
        }

        let inner = reqwest::blocking::Client::builder()
            .user_agent(&opts.user_agent)
            .default_headers(headers)
            .timeout(opts.timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ParseError::client("HttpClient", Some(anyhow::Error::new(e))))?;

        Ok(Self { inner })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(inner: reqwest::blocking::Client) -> Self {
        Self { inner }
    }
}

impl Fetcher for HttpClient {
    fn get(&self, url: &str) -> HttpResponse {
        let response = match self.inner.get(url).send() {
            Ok(r) => r,
            Err(e) => {
                debug!(url, error = %e, "request failed");
                return HttpResponse::failed();
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_lowercase());

        if let Some(len) = response.content_length() {
            if len as usize > MAX_CONTENT_LENGTH {
                debug!(url, len, "content too large");
                return HttpResponse::failed();
            }
        }

        let body: Bytes = match response.bytes() {
            Ok(b) => b,
            Err(e) => {
                debug!(url, error = %e, "failed to read body");
                return HttpResponse::failed();
            }
        };
        if body.len() > MAX_CONTENT_LENGTH {
            debug!(url, len = body.len(), "content too large");
            return HttpResponse::failed();
        }

        debug!(url, status, bytes = body.len(), "fetched");
        HttpResponse::new(status, decode_body(&body, content_type.as_deref()))
    }
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
    for part in lower.split(';') {
        let trimmed = part.trim();
        if let Some(charset) = trimmed.strip_prefix("charset=") {
            let charset = charset.trim_matches('"').trim_matches('\'');
            return Some(charset.to_string());
        }
    }
    None
}
