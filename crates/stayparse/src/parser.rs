// ABOUTME: Source dispatcher: an ordered registry of sources and the lazy per-URL extraction loop.
// ABOUTME: Each URL yields at most one Listing, from the first source that matches and succeeds.

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::models::Listing;
use crate::options::ParserBuilder;
use crate::resource::Fetcher;
use crate::sources::{default_sources, Source};

/// Dispatches URLs to registered sources.
pub struct ListingParser {
    sources: Vec<Box<dyn Source>>,
    fetcher: Box<dyn Fetcher>,
}

impl ListingParser {
    /// Create a new ParserBuilder for configuring the parser.
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn new(sources: Vec<Box<dyn Source>>, fetcher: Box<dyn Fetcher>) -> Self {
        Self { sources, fetcher }
    }

    /// Parser with the default sources and the given fetcher.
    pub fn with_fetcher(fetcher: Box<dyn Fetcher>) -> Self {
        Self::new(default_sources(), fetcher)
    }

    pub fn sources(&self) -> &[Box<dyn Source>] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Stable sort by ascending priority. Never applied implicitly.
    pub fn sort_sources_by_priority(&mut self) {
        self.sources.sort_by_key(|s| s.priority());
    }

    /// Position and source registered under `source_id`.
    pub fn get_source(&self, source_id: &str) -> Result<(usize, &dyn Source), ParseError> {
        let index = self
            .position(source_id)
            .ok_or_else(|| ParseError::source_not_found(source_id, "GetSource"))?;
        Ok((index, self.sources[index].as_ref()))
    }

    /// Replaces the source with the same id in place, or appends a new one.
    pub fn set_source(&mut self, source: Box<dyn Source>) {
        match self.position(source.id()) {
            Some(index) => self.sources[index] = source,
            None => self.sources.push(source),
        }
    }

    /// Replaces an already registered source, failing if its id is unknown.
    pub fn replace_source(&mut self, source: Box<dyn Source>) -> Result<usize, ParseError> {
        let index = self
            .position(source.id())
            .ok_or_else(|| ParseError::source_not_found(source.id(), "ReplaceSource"))?;
        self.sources[index] = source;
        Ok(index)
    }

    fn position(&self, source_id: &str) -> Option<usize> {
        self.sources.iter().position(|s| s.id() == source_id)
    }

    /// Listings for `urls`, extracted lazily as the iterator is advanced.
    pub fn parse<I>(&self, urls: I) -> Listings<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Listings {
            parser: self,
            urls: urls.into_iter(),
        }
    }

    /// Extracts a single URL, trying sources in registry order.
    pub fn parse_one(&self, url: &str) -> Option<Listing> {
        self.sources
            .iter()
            .find_map(|source| self.try_source(source.as_ref(), url))
    }

    /// Extracts already fetched HTML with the first source that matches `url` and succeeds.
    pub fn parse_html(&self, url: &str, html: &str) -> Option<Listing> {
        self.sources.iter().find_map(|source| {
            if !source.matches_url(url) {
                return None;
            }
            source
                .extract_html(url, html)
                .map_err(|e| debug!(source = source.id(), error = %e, "source failed"))
                .ok()
        })
    }

    fn try_source(&self, source: &dyn Source, url: &str) -> Option<Listing> {
        if !source.matches_url(url) {
            return None;
        }
        match source.extract(url, self.fetcher.as_ref()) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(source = source.id(), url, error = %e, "source failed, trying next");
                None
            }
        }
    }
}

/// Lazy sequence of listings; each `next` performs the fetches for one or more URLs.
pub struct Listings<'p, I> {
    parser: &'p ListingParser,
    urls: I,
}

impl<I> Iterator for Listings<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Listing;

    fn next(&mut self) -> Option<Listing> {
        for url in self.urls.by_ref() {
            let url = url.as_ref();
            match self.parser.parse_one(url) {
                Some(listing) => return Some(listing),
                None => debug!(url, "no source produced a listing"),
            }
        }
        None
    }
}
