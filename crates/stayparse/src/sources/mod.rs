// ABOUTME: The Source trait implemented by every supported booking site, plus its per-page context.
// ABOUTME: PageContext owns the fetched HTML, the parsed DOM and every lazily computed cache for one URL.

//! Site-specific extraction strategies.
//!
//! A [`Source`] knows which URLs it handles and how to pull each listing field
//! out of a page. All per-page state lives in a [`PageContext`] created for a
//! single extraction, so one source value can serve many URLs (and threads)
//! without leaking caches between them.

pub mod airbnb;
pub mod airbnb_fields;
pub mod airbnb_plus;
pub mod booking;

use once_cell::unsync::OnceCell;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::Html;
use serde_json::Value;
use tracing::{debug, info};

use crate::address::Address;
use crate::error::ParseError;
use crate::models::{Amenity, Listing};
use crate::resource::{Fetcher, HttpResponse};

pub use airbnb::Airbnb;
pub use airbnb_fields::AirbnbFields;
pub use airbnb_plus::AirbnbPlus;
pub use booking::Booking;

/// The default registry, in dispatch order.
pub fn default_sources() -> Vec<Box<dyn Source>> {
    vec![
        Box::new(Airbnb::new()),
        Box::new(AirbnbPlus::new()),
        Box::new(Booking::new()),
    ]
}

/// Anchored URL matcher: optional scheme, optional `www.`, then a site-specific body.
/// Scheme and `www.` match in any case; the body decides its own case rules.
///
/// An optional exclusion pattern rejects URLs the body would otherwise accept.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    include: Regex,
    exclude: Option<Regex>,
}

impl UrlPattern {
    pub fn new(body: &str) -> Result<Self, regex::Error> {
        let include = Regex::new(&format!(r"^(?i:https?://)?(?i:www\.)?(?:{})$", body))?;
        Ok(Self {
            include,
            exclude: None,
        })
    }

    /// Rejects URLs containing a match for `pattern`.
    pub fn excluding(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.exclude = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.include.is_match(url)
            && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(url))
    }
}

/// Fetcher that never reaches the network; used for pages supplied as HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl Fetcher for NoFetch {
    fn get(&self, _url: &str) -> HttpResponse {
        HttpResponse::failed()
    }
}

static NO_FETCH: NoFetch = NoFetch;

/// State for one extraction of one URL.
pub struct PageContext<'f> {
    url: String,
    source_code: String,
    document: Html,
    fetcher: &'f dyn Fetcher,
    embedded: OnceCell<Option<Value>>,
    listing_id: OnceCell<Option<u64>>,
    api_key: OnceCell<Option<String>>,
    price_data: OnceCell<Option<Value>>,
    amenities: OnceCell<Vec<Amenity>>,
}

impl<'f> PageContext<'f> {
    /// Parses `source_code`; follow-up requests (price lookups) go through `fetcher`.
    pub fn new(url: impl Into<String>, source_code: impl Into<String>, fetcher: &'f dyn Fetcher) -> Self {
        let source_code = source_code.into();
        let document = Html::parse_document(&source_code);
        Self {
            url: url.into(),
            source_code,
            document,
            fetcher,
            embedded: OnceCell::new(),
            listing_id: OnceCell::new(),
            api_key: OnceCell::new(),
            price_data: OnceCell::new(),
            amenities: OnceCell::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn fetcher(&self) -> &'f dyn Fetcher {
        self.fetcher
    }

    pub fn embedded_or_init(&self, f: impl FnOnce() -> Option<Value>) -> Option<&Value> {
        self.embedded.get_or_init(f).as_ref()
    }

    pub fn listing_id_or_init(&self, f: impl FnOnce() -> Option<u64>) -> Option<u64> {
        *self.listing_id.get_or_init(f)
    }

    pub fn api_key_or_init(&self, f: impl FnOnce() -> Option<String>) -> Option<&str> {
        self.api_key.get_or_init(f).as_deref()
    }

    pub fn price_data_or_init(&self, f: impl FnOnce() -> Option<Value>) -> Option<&Value> {
        self.price_data.get_or_init(f).as_ref()
    }

    pub fn amenities_or_init(&self, f: impl FnOnce() -> Vec<Amenity>) -> &[Amenity] {
        self.amenities.get_or_init(f)
    }
}

impl PageContext<'static> {
    /// Context for HTML that is already in hand. Secondary lookups yield nothing.
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(url, html, &NO_FETCH)
    }
}

/// A site-specific extraction strategy.
///
/// Only `id`, `url_pattern` and `title` are required. Every other field
/// falls back to an empty value so a source can grow field by field.
pub trait Source: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn id(&self) -> &str;

    fn url_pattern(&self) -> &UrlPattern;

    /// Lower values are tried first once the registry is sorted.
    fn priority(&self) -> i32 {
        0
    }

    fn matches_url(&self, url: &str) -> bool {
        self.url_pattern().is_match(url)
    }

    /// The title is mandatory; failing to find it fails the extraction.
    fn title(&self, page: &PageContext<'_>) -> Result<String, ParseError>;

    fn description(&self, _page: &PageContext<'_>) -> String {
        String::new()
    }

    fn address(&self, _page: &PageContext<'_>) -> Option<Address> {
        None
    }

    fn price(&self, _page: &PageContext<'_>) -> Option<Decimal> {
        None
    }

    fn images(&self, _page: &PageContext<'_>) -> Vec<String> {
        Vec::new()
    }

    fn max_guests(&self, _page: &PageContext<'_>) -> Option<u32> {
        None
    }

    fn cancellation_policy(&self, _page: &PageContext<'_>) -> Option<String> {
        None
    }

    /// Computes the amenity list. Call [`Source::amenities`] instead, which caches.
    fn compute_amenities(&self, _page: &PageContext<'_>) -> Vec<Amenity> {
        Vec::new()
    }

    /// Amenities for the page, computed on first use.
    fn amenities<'p>(&self, page: &'p PageContext<'_>) -> &'p [Amenity] {
        page.amenities_or_init(|| self.compute_amenities(page))
    }

    fn amenity_names(&self, page: &PageContext<'_>) -> Vec<String> {
        self.amenities(page)
            .iter()
            .map(Amenity::display_name)
            .collect()
    }

    /// Fetches `url` and extracts a listing from it.
    fn extract(&self, url: &str, fetcher: &dyn Fetcher) -> Result<Listing, ParseError> {
        if !self.matches_url(url) {
            return Err(ParseError::invalid_url(url, "Extract", None));
        }

        let response = fetcher.get(url);
        if !response.is_success() {
            let reason = match response.status {
                Some(status) => anyhow::anyhow!("HTTP status {}", status),
                None => anyhow::anyhow!("request failed"),
            };
            return Err(ParseError::fetch(url, "Extract", Some(reason)));
        }

        let page = PageContext::new(url, response.text, fetcher);
        self.extract_page(&page)
    }

    /// Extracts a listing from HTML that was obtained elsewhere.
    fn extract_html(&self, url: &str, html: &str) -> Result<Listing, ParseError> {
        if !self.matches_url(url) {
            return Err(ParseError::invalid_url(url, "ExtractHtml", None));
        }
        self.extract_page(&PageContext::from_html(url, html))
    }

    /// Builds the listing field by field. Only the title can fail.
    fn extract_page(&self, page: &PageContext<'_>) -> Result<Listing, ParseError> {
        let title = self.title(page)?;
        debug!(source = self.id(), url = page.url(), "title found");

        let listing = Listing {
            url: page.url().to_string(),
            title,
            description: self.description(page),
            images: self.images(page),
            price: self.price(page),
            services: self.amenities(page).to_vec(),
            service_names: self.amenity_names(page),
            address: self.address(page),
            cancellation_policy: self.cancellation_policy(page),
            max_guests: self.max_guests(page),
            source: self.id().to_string(),
        };
        info!(
            source = self.id(),
            url = page.url(),
            images = listing.images.len(),
            services = listing.services.len(),
            "listing extracted"
        );
        Ok(listing)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CannedFetcher;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        pattern: UrlPattern,
        computed: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                pattern: UrlPattern::new(r"newsource\.com(?:/.*)?").unwrap(),
                computed: AtomicUsize::new(0),
            }
        }
    }

    impl Source for CountingSource {
        fn id(&self) -> &str {
            "new_source"
        }

        fn url_pattern(&self) -> &UrlPattern {
            &self.pattern
        }

        fn title(&self, page: &PageContext<'_>) -> Result<String, ParseError> {
            crate::extractors::select::first_text(page.document(), &["h1"])
                .ok_or_else(|| ParseError::field_not_found(page.url(), "Title", None))
        }

        fn compute_amenities(&self, _page: &PageContext<'_>) -> Vec<Amenity> {
            self.computed.fetch_add(1, Ordering::SeqCst);
            vec![Amenity::Facility {
                category: "General".to_string(),
                name: "Wifi".to_string(),
            }]
        }
    }

    #[test]
    fn url_pattern_is_anchored_and_scheme_optional() {
        let pattern = UrlPattern::new(r"newsource\.com(?:/.*)?").unwrap();
        assert!(pattern.is_match("https://www.newsource.com/one"));
        assert!(pattern.is_match("http://newsource.com"));
        assert!(pattern.is_match("newsource.com/two"));
        assert!(!pattern.is_match("https://evil.test/?r=newsource.com"));
        assert!(!pattern.is_match("ftp://newsource.com/one"));
        assert!(pattern.is_match("HTTP://WWW.newsource.com/one"));
        assert!(!pattern.is_match("https://www.NEWSOURCE.com/one"));
    }

    #[test]
    fn url_pattern_exclusion() {
        let pattern = UrlPattern::new(r"newsource\.com(?:/.*)?")
            .unwrap()
            .excluding("/private/")
            .unwrap();
        assert!(pattern.is_match("https://newsource.com/public/1"));
        assert!(!pattern.is_match("https://newsource.com/private/1"));
    }

    #[test]
    fn amenities_are_computed_once() {
        let source = CountingSource::new();
        let page = PageContext::from_html("https://newsource.com/1", "<h1>Room</h1>");

        let first = source.amenities(&page).to_vec();
        let second = source.amenities(&page).to_vec();
        assert_eq!(first, second);
        assert_eq!(source.amenity_names(&page), vec!["General: Wifi"]);
        assert_eq!(source.computed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fresh_context_per_url() {
        let source = CountingSource::new();
        let one = PageContext::from_html("https://newsource.com/1", "<h1>One</h1>");
        let two = PageContext::from_html("https://newsource.com/2", "<h1>Two</h1>");
        source.amenities(&one);
        source.amenities(&two);
        assert_eq!(source.computed.load(Ordering::SeqCst), 2);
        assert_eq!(source.title(&two).unwrap(), "Two");
    }

    #[test]
    fn extract_rejects_foreign_url() {
        let source = CountingSource::new();
        let fetcher = CannedFetcher::default();
        let err = source.extract("https://other.test/1", &fetcher).unwrap_err();
        assert!(err.is_invalid_url());
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn extract_reports_failed_fetch() {
        let source = CountingSource::new();
        let fetcher = CannedFetcher::default()
            .with("https://newsource.com/gone", HttpResponse::new(404, "missing"));
        let err = source.extract("https://newsource.com/gone", &fetcher).unwrap_err();
        assert!(err.is_fetch());

        let err = source.extract("https://newsource.com/down", &fetcher).unwrap_err();
        assert!(err.is_fetch());
    }

    #[test]
    fn extract_missing_title_is_field_not_found() {
        let source = CountingSource::new();
        let fetcher = CannedFetcher::default()
            .with("https://newsource.com/1", HttpResponse::new(200, "<p>no title</p>"));
        let err = source.extract("https://newsource.com/1", &fetcher).unwrap_err();
        assert!(err.is_field_not_found());
    }

    #[test]
    fn extract_builds_listing_with_defaults() {
        let source = CountingSource::new();
        let fetcher = CannedFetcher::default()
            .with("https://newsource.com/1", HttpResponse::new(200, "<h1> Sea view </h1>"));
        let listing = source.extract("https://newsource.com/1", &fetcher).unwrap();

        assert_eq!(listing.url, "https://newsource.com/1");
        assert_eq!(listing.title, "Sea view");
        assert_eq!(listing.description, "");
        assert!(listing.images.is_empty());
        assert_eq!(listing.price, None);
        assert_eq!(listing.address, None);
        assert_eq!(listing.service_names, vec!["General: Wifi"]);
        assert_eq!(listing.source, "new_source");
    }
}
