// ABOUTME: Field extraction shared by the Airbnb sources, driven by the page's embedded JSON.
// ABOUTME: Covers description, address, capacity, photos, amenities and the price API round trip.

use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::address::Address;
use crate::error::ParseError;
use crate::extractors::embedded::EmbeddedJson;
use crate::extractors::json_path::{is_falsy, resolve_present};
use crate::extractors::select::first_text;
use crate::models::Amenity;
use crate::sources::PageContext;

pub const PRICE_ENDPOINT: &str = "https://www.airbnb.co.uk/api/v2/pdp_listing_booking_details";

/// Sort order given to photos that carry none.
const UNSORTED_PHOTO: i64 = 999;

/// Photo size keys, best first.
const PHOTO_SIZES: &[&str] = &["xx_large", "x_large", "large"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Selectors, JSON paths and endpoints used to read an Airbnb listing page.
#[derive(Debug, Clone)]
pub struct AirbnbFields {
    pub embedded: EmbeddedJson,
    pub title_selectors: Vec<String>,
    pub description_path: Vec<String>,
    /// Tried in order; the last one that resolves wins.
    pub address_paths: Vec<Vec<String>>,
    pub max_guests_path: Vec<String>,
    pub photos_path: Vec<String>,
    pub amenities_path: Vec<String>,
    pub id_path: Vec<String>,
    /// Resolved from the document root, not the listing.
    pub api_key_path: Vec<String>,
    pub price_endpoint: String,
}

fn path(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for AirbnbFields {
    fn default() -> Self {
        Self {
            embedded: EmbeddedJson {
                script_selector: "script[data-state=true]".to_string(),
                script_selector_fallback: "script[data-hypernova-key=spaspabundlejs]".to_string(),
                root_key: "bootstrapData".to_string(),
                listing_path: path(&["reduxData", "homePDP", "listingInfo", "listing"]),
            },
            title_selectors: path(&[
                "div#summary h1",
                "div[data-plugin-in-point-id=TITLE_DEFAULT] h1",
                "section#summary h1",
                "h1",
            ]),
            description_path: path(&["sectioned_description", "description"]),
            address_paths: vec![path(&["p3_summary_address"]), path(&["location_title"])],
            max_guests_path: path(&["person_capacity"]),
            photos_path: path(&["photos"]),
            amenities_path: path(&["listing_amenities"]),
            id_path: path(&["id"]),
            api_key_path: path(&["layout-init", "api_config", "key"]),
            price_endpoint: PRICE_ENDPOINT.to_string(),
        }
    }
}

impl AirbnbFields {
    pub fn with_price_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.price_endpoint = endpoint.into();
        self
    }

    pub fn title(&self, page: &PageContext<'_>) -> Result<String, ParseError> {
        let selectors: Vec<&str> = self.title_selectors.iter().map(String::as_str).collect();
        first_text(page.document(), &selectors).ok_or_else(|| {
            ParseError::field_not_found(
                page.url(),
                "Title",
                Some(anyhow::anyhow!("no title selector matched")),
            )
        })
    }

    pub fn description(&self, page: &PageContext<'_>) -> String {
        self.embedded
            .listing_node(page, &self.description_path)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    pub fn address(&self, page: &PageContext<'_>) -> Option<Address> {
        let mut result = None;
        for candidate in &self.address_paths {
            let parsed = self
                .embedded
                .listing_node(page, candidate)
                .and_then(Value::as_str)
                .and_then(Address::parse);
            if parsed.is_some() {
                result = parsed;
            }
        }
        result
    }

    pub fn max_guests(&self, page: &PageContext<'_>) -> Option<u32> {
        self.embedded
            .listing_node(page, &self.max_guests_path)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Photo URLs ordered by `sort_order`, picking the largest size each photo offers.
    pub fn images(&self, page: &PageContext<'_>) -> Vec<String> {
        let Some(photos) = self
            .embedded
            .listing_node(page, &self.photos_path)
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };
        ordered_photo_urls(photos)
    }

    pub fn compute_amenities(&self, page: &PageContext<'_>) -> Vec<Amenity> {
        self.embedded
            .listing_node(page, &self.amenities_path)
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(Amenity::Raw).collect())
            .unwrap_or_default()
    }

    /// Numeric listing id; numeric strings are converted.
    pub fn listing_id(&self, page: &PageContext<'_>) -> Option<u64> {
        page.listing_id_or_init(|| {
            match self.embedded.listing_node(page, &self.id_path)? {
                Value::Number(n) => n.as_u64(),
                Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                    s.parse().ok()
                }
                _ => None,
            }
        })
    }

    pub fn api_key<'p>(&self, page: &'p PageContext<'_>) -> Option<&'p str> {
        page.api_key_or_init(|| {
            self.embedded
                .root_node(page, &self.api_key_path)
                .and_then(Value::as_str)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
        })
    }

    /// Availability query for a one-night stay starting `check_in`.
    pub fn price_url(&self, listing_id: u64, api_key: &str, check_in: NaiveDate) -> Option<String> {
        let check_out = check_in + Duration::days(1);
        let mut url = match Url::parse(&self.price_endpoint) {
            Ok(u) => u,
            Err(e) => {
                debug!(endpoint = %self.price_endpoint, error = %e, "bad price endpoint");
                return None;
            }
        };
        url.query_pairs_mut()
            .append_pair("_format", "for_web_with_date")
            .append_pair("_intents", "p3_book_it")
            .append_pair("_interaction_type", "dateChanged")
            .append_pair("check_in", &check_in.format(DATE_FORMAT).to_string())
            .append_pair("check_out", &check_out.format(DATE_FORMAT).to_string())
            .append_pair("currency", "EUR")
            .append_pair("force_boost_unc_priority_message_type", "")
            .append_pair("guests", "1")
            .append_pair("key", api_key)
            .append_pair("listing_id", &listing_id.to_string())
            .append_pair("locale", "en-GB")
            .append_pair("number_of_adults", "1")
            .append_pair("number_of_children", "0")
            .append_pair("number_of_infants", "0");
        Some(url.into())
    }

    /// Booking details from the price API, fetched at most once per page.
    pub fn price_data<'p>(&self, page: &'p PageContext<'_>) -> Option<&'p Value> {
        self.price_data_from(page, Local::now().date_naive())
    }

    /// Like [`AirbnbFields::price_data`] for a one-night stay from `check_in`.
    /// The first call on a page decides the date that gets cached.
    pub fn price_data_from<'p>(
        &self,
        page: &'p PageContext<'_>,
        check_in: NaiveDate,
    ) -> Option<&'p Value> {
        page.price_data_or_init(|| {
            let listing_id = self.listing_id(page)?;
            let api_key = self.api_key(page)?;
            let url = self.price_url(listing_id, api_key, check_in)?;

            let response = page.fetcher().get(&url);
            let Some(mut json) = response.json else {
                debug!(url = page.url(), status = ?response.status, "price lookup returned no JSON");
                return None;
            };
            json.get_mut("pdp_listing_booking_details").map(Value::take)
        })
    }

    /// Nightly rate of the last booking option for tonight, if the API reported one.
    pub fn price(&self, page: &PageContext<'_>) -> Option<Decimal> {
        self.price_from(page, Local::now().date_naive())
    }

    pub fn price_from(&self, page: &PageContext<'_>, check_in: NaiveDate) -> Option<Decimal> {
        let details = self.price_data_from(page, check_in)?.as_array()?;
        let amount = resolve_present(details.last(), &["p3_display_rate", "amount"])?;
        decimal_from_json(amount)
    }
}

fn ordered_photo_urls(photos: &[Value]) -> Vec<String> {
    let mut ordered: Vec<&Value> = photos.iter().filter(|p| p.is_object()).collect();
    ordered.sort_by_key(|p| {
        p.get("sort_order")
            .and_then(Value::as_i64)
            .unwrap_or(UNSORTED_PHOTO)
    });
    ordered
        .into_iter()
        .filter_map(|photo| {
            PHOTO_SIZES
                .iter()
                .find_map(|size| photo.get(*size).and_then(Value::as_str))
                .map(str::to_string)
        })
        .collect()
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}
