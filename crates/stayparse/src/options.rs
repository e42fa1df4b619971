// ABOUTME: Configuration options for the listing parser and the ParserBuilder fluent API.
// ABOUTME: The user agent and cache header are fixed browser-like defaults.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ParseError;
use crate::parser::ListingParser;
use crate::resource::{Fetcher, HttpClient};
use crate::sources::{default_sources, Source};

/// Browser user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
}

impl Default for Options {
    fn default() -> Self {
        let mut headers = HashMap::new();
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers,
        }
    }
}

/// Builder for constructing ListingParser instances with custom configuration.
pub struct ParserBuilder {
    opts: Options,
    sources: Option<Vec<Box<dyn Source>>>,
    fetcher: Option<Box<dyn Fetcher>>,
}

impl ParserBuilder {
    /// Create a new ParserBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
            sources: None,
            fetcher: None,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Replace the default source registry.
    pub fn sources(mut self, sources: Vec<Box<dyn Source>>) -> Self {
        self.sources = Some(sources);
        self
    }

    /// Use a custom fetcher instead of the HTTP client.
    pub fn fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Build the parser with the configured options.
    pub fn build(self) -> Result<ListingParser, ParseError> {
        let fetcher = match self.fetcher {
            Some(f) => f,
            None => Box::new(HttpClient::new(&self.opts)?),
        };
        let sources = self.sources.unwrap_or_else(default_sources);
        Ok(ListingParser::new(sources, fetcher))
    }
}

impl Default for ParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{Booking, NoFetch};

    #[test]
    fn defaults_disable_caching() {
        let opts = Options::default();
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert_eq!(opts.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(opts.headers.get("Cache-Control").map(String::as_str), Some("no-cache"));
    }

    #[test]
    fn builder_uses_default_sources() {
        let parser = ParserBuilder::new().fetcher(Box::new(NoFetch)).build().unwrap();
        assert_eq!(parser.len(), 3);
    }

    #[test]
    fn builder_with_custom_sources() {
        let parser = ListingParser::builder()
            .timeout(Duration::from_secs(5))
            .header("Accept-Language", "en-GB")
            .sources(vec![Box::new(Booking::new())])
            .build()
            .unwrap();
        assert_eq!(parser.len(), 1);
        assert_eq!(parser.sources()[0].id(), "booking");
    }

    #[test]
    fn invalid_header_is_a_client_error() {
        let err = ParserBuilder::new()
            .header("bad header", "x")
            .build()
            .err()
            .unwrap();
        assert!(err.is_client());
    }
}
