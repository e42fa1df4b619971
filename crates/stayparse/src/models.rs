// ABOUTME: Listing record produced by the extraction pipeline and the Amenity item type.
// ABOUTME: Field order of Listing matches the JSON emitted by the CLI.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;

/// One amenity as the originating site describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amenity {
    /// A facility grouped under a category heading.
    Facility { category: String, name: String },
    /// A raw item taken verbatim from embedded page data.
    Raw(Value),
}

impl Amenity {
    /// Human-readable name of the amenity.
    pub fn display_name(&self) -> String {
        match self {
            Amenity::Facility { category, name } => format!("{}: {}", category, name),
            Amenity::Raw(item) => match item.get("name") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            },
        }
    }
}

/// A normalized property listing. Identity is the source URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Listing {
    pub url: String,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub price: Option<Decimal>,
    pub services: Vec<Amenity>,
    pub service_names: Vec<String>,
    pub address: Option<Address>,
    pub cancellation_policy: Option<String>,
    pub max_guests: Option<u32>,
    pub source: String,
}

impl Listing {
    pub fn id(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn id_is_url() {
        let listing = Listing {
            url: "https://booking.com".to_string(),
            ..Default::default()
        };
        assert_eq!(listing.id(), "https://booking.com");
    }

    #[test]
    fn display_names() {
        let facility = Amenity::Facility {
            category: "Languages spoken".to_string(),
            name: "Turkish".to_string(),
        };
        assert_eq!(facility.display_name(), "Languages spoken: Turkish");

        let raw = Amenity::Raw(json!({"id": 8, "name": "Kitchen"}));
        assert_eq!(raw.display_name(), "Kitchen");

        let nameless = Amenity::Raw(json!({"id": 9}));
        assert_eq!(nameless.display_name(), "");
    }

    #[test]
    fn serializes_in_field_order() {
        let listing = Listing {
            url: "https://booking.com".to_string(),
            title: "Test property".to_string(),
            description: "Test property description".to_string(),
            images: vec!["image one".to_string(), "image two".to_string()],
            price: Some(Decimal::from_str("12.33").unwrap()),
            services: vec![
                Amenity::Raw(json!({"service_one": "service_one"})),
                Amenity::Facility {
                    category: "Food".to_string(),
                    name: "Bar".to_string(),
                },
            ],
            service_names: vec![],
            address: None,
            cancellation_policy: None,
            max_guests: None,
            source: "booking".to_string(),
        };

        let encoded = serde_json::to_string(&listing).unwrap();
        assert_eq!(
            encoded,
            "{\"url\":\"https://booking.com\",\"title\":\"Test property\",\
\"description\":\"Test property description\",\"images\":[\"image one\",\"image two\"],\
\"price\":\"12.33\",\"services\":[{\"service_one\":\"service_one\"},\
{\"category\":\"Food\",\"name\":\"Bar\"}],\"service_names\":[],\"address\":null,\
\"cancellation_policy\":null,\"max_guests\":null,\"source\":\"booking\"}"
        );
    }
}
