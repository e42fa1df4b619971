// ABOUTME: Source for Airbnb Plus room pages (URLs with a /plus/ segment).
// ABOUTME: Shares every field extractor with the regular Airbnb source.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::address::Address;
use crate::error::ParseError;
use crate::models::Amenity;
use crate::sources::{AirbnbFields, PageContext, Source, UrlPattern};

static AIRBNB_PLUS_PATTERN: Lazy<UrlPattern> =
    Lazy::new(|| UrlPattern::new(r"(?i:airbnb\.[a-z.]+)(?::\d+)?/(?:.*/)?plus/.*").unwrap());

/// Parser for airbnb.com Plus listings.
#[derive(Debug, Clone)]
pub struct AirbnbPlus {
    pattern: UrlPattern,
    priority: i32,
    fields: AirbnbFields,
}

impl AirbnbPlus {
    pub fn new() -> Self {
        Self::with_fields(AirbnbFields::default())
    }

    pub fn with_fields(fields: AirbnbFields) -> Self {
        Self {
            pattern: AIRBNB_PLUS_PATTERN.clone(),
            priority: 0,
            fields,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for AirbnbPlus {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for AirbnbPlus {
    fn id(&self) -> &str {
        "airbnb_plus"
    }

    fn url_pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn title(&self, page: &PageContext<'_>) -> Result<String, ParseError> {
        self.fields.title(page)
    }

    fn description(&self, page: &PageContext<'_>) -> String {
        self.fields.description(page)
    }

    fn address(&self, page: &PageContext<'_>) -> Option<Address> {
        self.fields.address(page)
    }

    fn price(&self, page: &PageContext<'_>) -> Option<Decimal> {
        self.fields.price(page)
    }

    fn images(&self, page: &PageContext<'_>) -> Vec<String> {
        self.fields.images(page)
    }

    fn max_guests(&self, page: &PageContext<'_>) -> Option<u32> {
        self.fields.max_guests(page)
    }

    fn compute_amenities(&self, page: &PageContext<'_>) -> Vec<Amenity> {
        self.fields.compute_amenities(page)
    }
}
