// ABOUTME: Locates and parses the JSON state a page inlines in a <script> tag.
// ABOUTME: Resolves listing fields from it via json_path, caching the parsed blob on the PageContext.

use serde_json::Value;
use tracing::debug;

use crate::extractors::json_path::resolve;
use crate::extractors::select::select_first;
use crate::sources::PageContext;

/// Where a site keeps its embedded JSON and where the listing lives inside it.
#[derive(Debug, Clone)]
pub struct EmbeddedJson {
    pub script_selector: String,
    pub script_selector_fallback: String,
    /// Top-level member holding the page state.
    pub root_key: String,
    /// Prefix prepended to every listing lookup.
    pub listing_path: Vec<String>,
}

impl EmbeddedJson {
    /// The parsed blob for `page`, parsed on first use.
    pub fn data<'p>(&self, page: &'p PageContext<'_>) -> Option<&'p Value> {
        page.embedded_or_init(|| self.parse(page))
    }

    /// Resolves `path` under the listing prefix.
    pub fn listing_node<'p, S: AsRef<str>>(
        &self,
        page: &'p PageContext<'_>,
        path: &[S],
    ) -> Option<&'p Value> {
        let full: Vec<&str> = self
            .listing_path
            .iter()
            .map(String::as_str)
            .chain(path.iter().map(AsRef::as_ref))
            .collect();
        resolve(self.data(page), &full)
    }

    /// Resolves `path` from the top of the blob.
    pub fn root_node<'p, S: AsRef<str>>(
        &self,
        page: &'p PageContext<'_>,
        path: &[S],
    ) -> Option<&'p Value> {
        resolve(self.data(page), path)
    }

    fn parse(&self, page: &PageContext<'_>) -> Option<Value> {
        let doc = page.document();
        let Some(element) = select_first(doc, &self.script_selector)
            .or_else(|| select_first(doc, &self.script_selector_fallback))
        else {
            debug!(url = page.url(), "no embedded data script");
            return None;
        };

        let raw: String = element.text().collect();
        let payload = strip_comment_markers(&raw);
        let mut parsed: Value = match serde_json::from_str(payload.trim()) {
            Ok(v) => v,
            Err(e) => {
                debug!(url = page.url(), error = %e, "embedded data is not valid JSON");
                return None;
            }
        };

        match parsed.get_mut(&self.root_key) {
            Some(inner) => Some(inner.take()),
            None => {
                debug!(url = page.url(), key = %self.root_key, "embedded data has no root key");
                None
            }
        }
    }
}

/// Removes HTML comment markers wrapping a script payload.
pub fn strip_comment_markers(raw: &str) -> String {
    raw.replace("<!--", "").replace("-->", "")
}
