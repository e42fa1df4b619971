// ABOUTME: Main library entry point for the stayparse listing scraper.
// ABOUTME: Re-exports the public API: ListingParser, ParserBuilder, Listing, Address, Source and the error types.

//! Stayparse - extracts normalized vacation-rental listings from booking sites.
//!
//! Each supported site is a [`Source`]. The [`ListingParser`] fetches a URL,
//! hands it to the first source whose URL pattern matches and returns the
//! resulting [`Listing`]. URLs nobody can handle are skipped silently.
//!
//! # Example
//!
//! ```no_run
//! use stayparse::{ListingParser, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let parser = ListingParser::builder().build()?;
//!     for listing in parser.parse(["https://www.airbnb.co.uk/rooms/4950937"]) {
//!         println!("{} ({})", listing.title, listing.source);
//!     }
//!     Ok(())
//! }
//! ```

pub mod address;
pub mod error;
pub mod extractors;
pub mod models;
pub mod options;
pub mod parser;
pub mod resource;
pub mod sources;

pub use crate::address::Address;
pub use crate::error::{ErrorCode, ParseError};
pub use crate::models::{Amenity, Listing};
pub use crate::options::{Options, ParserBuilder};
pub use crate::parser::{ListingParser, Listings};
pub use crate::resource::{Fetcher, HttpClient, HttpResponse};
pub use crate::sources::{
    default_sources, Airbnb, AirbnbFields, AirbnbPlus, Booking, PageContext, Source, UrlPattern,
};
