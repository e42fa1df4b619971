// ABOUTME: Selector-based field extraction utilities over a parsed HTML document.
// ABOUTME: Tries selectors in priority order; first non-empty match wins.

//! DOM-selector extraction.
//!
//! Key behaviors:
//! - Selectors are tried in order; the first selector with a non-empty match wins.
//! - Text is whitespace-normalized (runs collapsed to a single space, trimmed).
//! - Invalid selectors are skipped rather than reported.

use scraper::{ElementRef, Html};

use crate::extractors::compiled::get_or_compile;

/// Normalizes whitespace in a string by collapsing runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize_whitespace(&el.text().collect::<String>())
}

/// Returns the text of the first element matching any of `selectors`, in order.
pub fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for css in selectors {
        let Some(sel) = get_or_compile(css) else {
            continue;
        };
        for el in doc.select(&sel) {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Returns all elements matching `css`, in document order.
pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match get_or_compile(css) {
        Some(sel) => doc.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Returns the first element matching `css`.
pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = get_or_compile(css)?;
    doc.select(&sel).next()
}

/// Returns the first descendant of `el` matching `css`.
pub fn select_first_in<'a>(el: &ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = get_or_compile(css)?;
    el.select(&sel).next()
}

/// Returns all descendants of `el` matching `css`.
pub fn select_all_in<'a>(el: &ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match get_or_compile(css) {
        Some(sel) => el.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Collects the `attr` value of every element matching `css`, skipping elements without it.
pub fn all_attrs(doc: &Html, css: &str, attr: &str) -> Vec<String> {
    select_all(doc, css)
        .iter()
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <html>
        <body>
            <h2 id="hp_hotel_name">  Milestone   Hotel  </h2>
            <div id="photos_distinct">
                <a href="/images/max400/1.jpg"></a>
                <a></a>
                <a href=" /images/max400/2.png "></a>
            </div>
            <div class="empty"></div>
        </body>
        </html>
    "#;

    #[test]
    fn first_text_normalizes_whitespace() {
        let doc = Html::parse_document(SAMPLE_HTML);
        assert_eq!(
            first_text(&doc, &["h2#hp_hotel_name"]),
            Some("Milestone Hotel".to_string())
        );
    }

    #[test]
    fn first_text_follows_selector_priority() {
        let doc = Html::parse_document(SAMPLE_HTML);
        let found = first_text(&doc, &["h1.missing", "div.empty", "[[[bad", "h2"]);
        assert_eq!(found, Some("Milestone Hotel".to_string()));
        assert_eq!(first_text(&doc, &["h1", "div.empty"]), None);
    }

    #[test]
    fn all_attrs_skips_missing_values() {
        let doc = Html::parse_document(SAMPLE_HTML);
        assert_eq!(
            all_attrs(&doc, "div#photos_distinct a", "href"),
            vec!["/images/max400/1.jpg", "/images/max400/2.png"]
        );
    }

    #[test]
    fn nested_selection() {
        let doc = Html::parse_document(SAMPLE_HTML);
        let container = select_first(&doc, "div#photos_distinct").unwrap();
        assert_eq!(select_all_in(&container, "a").len(), 3);
        assert!(select_first_in(&container, "span").is_none());
    }
}
