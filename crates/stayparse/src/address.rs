// ABOUTME: Structured postal address and the free-text address normalizer.
// ABOUTME: Splits delimiter-separated strings into country, region and street parts from the right.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default delimiter for free-text addresses.
pub const DEFAULT_DELIMITER: &str = ",";

/// A property address. Only the country is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub region: Option<String>,
    pub address: Option<String>,
}

impl Address {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            region: None,
            address: None,
        }
    }

    /// Parses a free-text address split on `,`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::parse_with_delimiter(raw, DEFAULT_DELIMITER)
    }

    /// Parses a free-text address.
    ///
    /// Segments are assigned from the right: the last one is the country, the
    /// one before it (if at least two remain) the region, and whatever is left
    /// is joined with ", " into the street field.
    ///
    /// Empty segments are dropped. Returns `None` when no segment is left.
    pub fn parse_with_delimiter(raw: &str, delimiter: &str) -> Option<Self> {
        if delimiter.is_empty() {
            return None;
        }

        let mut parts: Vec<&str> = raw
            .split(delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let country = parts.pop()?;

        let region = if parts.len() >= 2 {
            parts.pop().map(str::to_string)
        } else {
            None
        };

        let address = if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        };

        Some(Self {
            country: country.to_string(),
            region,
            address,
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            self.address.as_deref(),
            self.region.as_deref(),
            Some(self.country.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}
