// ABOUTME: Source for booking.com hotel pages, extracted purely with CSS selectors.
// ABOUTME: Facilities come out as (category, name) pairs grouped by checklist section.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::address::Address;
use crate::error::ParseError;
use crate::extractors::select::{
    all_attrs, element_text, first_text, select_all, select_all_in, select_first_in,
};
use crate::models::Amenity;
use crate::sources::{PageContext, Source, UrlPattern};

static BOOKING_PATTERN: Lazy<UrlPattern> =
    Lazy::new(|| UrlPattern::new(r"(?i:booking\.[a-z.]+)(?::\d+)?(?:[/?#].*)?").unwrap());

/// Title selectors, newest markup first.
const TITLE_SELECTORS: &[&str] = &["h2#hp_hotel_name", "h2.pp-header__title", "h1.hp__hotel-name"];
const DESCRIPTION_SELECTOR: &str = "div#property_description_content";
const ADDRESS_SELECTOR: &str = "p.address span.hp_address_subtitle";
const IMAGES_SELECTOR: &str = "div#photos_distinct a";
const FACILITIES_SELECTOR: &str = "div.facilitiesChecklistSection";

/// Thumbnail size in gallery links and the size requested instead.
const THUMBNAIL_SIZE: &str = "max400";
const FULL_SIZE: &str = "max1024x768";

/// Parser for booking.com listings.
#[derive(Debug, Clone)]
pub struct Booking {
    pattern: UrlPattern,
    priority: i32,
}

impl Booking {
    pub fn new() -> Self {
        Self {
            pattern: BOOKING_PATTERN.clone(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Default for Booking {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for Booking {
    fn id(&self) -> &str {
        "booking"
    }

    fn url_pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn title(&self, page: &PageContext<'_>) -> Result<String, ParseError> {
        first_text(page.document(), TITLE_SELECTORS).ok_or_else(|| {
            ParseError::field_not_found(
                page.url(),
                "Title",
                Some(anyhow::anyhow!("no title selector matched")),
            )
        })
    }

    fn description(&self, page: &PageContext<'_>) -> String {
        first_text(page.document(), &[DESCRIPTION_SELECTOR]).unwrap_or_default()
    }

    fn address(&self, page: &PageContext<'_>) -> Option<Address> {
        first_text(page.document(), &[ADDRESS_SELECTOR]).and_then(|raw| Address::parse(&raw))
    }

    fn images(&self, page: &PageContext<'_>) -> Vec<String> {
        all_attrs(page.document(), IMAGES_SELECTOR, "href")
            .into_iter()
            .map(|href| href.replace(THUMBNAIL_SIZE, FULL_SIZE))
            .collect()
    }

    fn compute_amenities(&self, page: &PageContext<'_>) -> Vec<Amenity> {
        let mut facilities = Vec::new();
        for section in select_all(page.document(), FACILITIES_SELECTOR) {
            let Some(heading) = select_first_in(&section, "h5") else {
                debug!(url = page.url(), "facility section without heading");
                continue;
            };
            let category = element_text(&heading);
            for item in select_all_in(&section, "ul li") {
                let tag = select_first_in(&item, "span").unwrap_or(item);
                facilities.push(Amenity::Facility {
                    category: category.clone(),
                    name: element_text(&tag),
                });
            }
        }
        facilities
    }
}
