// ABOUTME: Field extraction helpers shared by every source.
// ABOUTME: CSS selection over the parsed DOM and path lookups into embedded page JSON.

//! Extraction building blocks.
//!
//! Submodules:
//! - `compiled`: process-wide cache of compiled CSS selectors.
//! - `select`: selector-based text and attribute helpers.
//! - `json_path`: walking key paths through nested JSON objects.
//! - `embedded`: locating the JSON state inlined in a page's script tag.

pub mod compiled;
pub mod embedded;
pub mod json_path;
pub mod select;
