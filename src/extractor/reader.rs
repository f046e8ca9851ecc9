use kuchiki::traits::TendrilSink;
use readability::extractor;
use tracing::debug;
use url::Url;

use crate::extractor::cleaner::{inner_html, strip_disallowed};
use crate::extractor::model::ReaderOutput;

/// Containers tried, in order, when reader mode gives nothing usable.
pub const CONTAINER_SELECTORS: [&str; 5] = ["article", "main", ".news", ".content", "body"];

/// A reader-mode algorithm isolating the main content of a document.
pub trait Reader: Send + Sync {
    fn parse(&self, html: &str, url: &Url) -> Option<ReaderOutput>;
}

/// [`Reader`] backed by the `readability` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadabilityReader;

impl Reader for ReadabilityReader {
    fn parse(&self, html: &str, url: &Url) -> Option<ReaderOutput> {
        match extractor::extract(&mut html.as_bytes(), url) {
            Ok(product) => Some(ReaderOutput {
                title: non_empty(product.title),
                content_html: non_empty(product.content),
                text_content: non_empty(product.text),
            }),
            Err(e) => {
                debug!(%url, error = ?e, "Readability extraction failed");
                None
            }
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

/// Inner HTML of the first content container that has anything in it,
/// after layout and script elements have been stripped from the document.
pub fn structural_extract(html: &str) -> Option<String> {
    let document = kuchiki::parse_html().one(html);
    strip_disallowed(&document);

    CONTAINER_SELECTORS.iter().find_map(|selector| {
        let container = document.select_first(selector).ok()?;
        let inner = inner_html(container.as_node());
        (!inner.trim().is_empty()).then(|| {
            debug!(selector, "Structural fallback picked container");
            inner
        })
    })
}
