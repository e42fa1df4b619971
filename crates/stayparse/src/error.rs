// ABOUTME: Error types for the listing parser including ErrorCode enum and ParseError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    FieldNotFound,
    SourceNotFound,
    Client,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::FieldNotFound => "field not found",
            ErrorCode::SourceNotFound => "source not found",
            ErrorCode::Client => "client error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction and registry operations.
///
/// `url` holds the page URL for extraction errors and the source id for
/// registry lookups.
#[derive(Debug, thiserror::Error)]
pub struct ParseError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stayparse: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ParseError {
    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidUrl,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::Fetch,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a FieldNotFound error.
    pub fn field_not_found(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code: ErrorCode::FieldNotFound,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a SourceNotFound error for a registry lookup.
    pub fn source_not_found(source_id: impl Into<String>, op: impl Into<String>) -> Self {
        let source_id = source_id.into();
        Self {
            code: ErrorCode::SourceNotFound,
            source: Some(anyhow::anyhow!(
                "source with id={} has not been found",
                source_id
            )),
            url: source_id,
            op: op.into(),
        }
    }

    /// Create a Client error (transport could not be constructed).
    pub fn client(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Client,
            url: String::new(),
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a FieldNotFound error.
    pub fn is_field_not_found(&self) -> bool {
        self.code == ErrorCode::FieldNotFound
    }

    /// Returns true if this is a SourceNotFound error.
    pub fn is_source_not_found(&self) -> bool {
        self.code == ErrorCode::SourceNotFound
    }

    /// Returns true if this is a Client error.
    pub fn is_client(&self) -> bool {
        self.code == ErrorCode::Client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_url_and_code() {
        let err = ParseError::fetch(
            "https://www.airbnb.com/rooms/12",
            "Extract",
            Some(anyhow::anyhow!("HTTP status 503")),
        );
        assert_eq!(
            err.to_string(),
            "stayparse: Extract https://www.airbnb.com/rooms/12: fetch error: HTTP status 503"
        );
        assert!(err.is_fetch());
        assert!(!err.is_invalid_url());
    }

    #[test]
    fn source_not_found_names_the_id() {
        let err = ParseError::source_not_found("invalid_source_id", "GetSource");
        assert!(err.is_source_not_found());
        assert!(err.to_string().contains("id=invalid_source_id"));
    }
}
