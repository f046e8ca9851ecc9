use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::listing::errors::ListingError;
use crate::text::clean_text;

/// Return the elements matched by the first selector that matches anything.
///
/// Later selectors are ignored once one matches, even if they would match
/// too. Selectors that fail to compile are logged and skipped.
pub fn find<'a>(
    document: &'a Html,
    selectors: &[String],
) -> Result<Vec<ElementRef<'a>>, ListingError> {
    for raw in selectors {
        let Some(selector) = compile(raw) else {
            continue;
        };
        let found: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !found.is_empty() {
            debug!(selector = %raw, count = found.len(), "Matched listing elements");
            return Ok(found);
        }
    }

    Err(ListingError::NoElementsFound {
        tried: selectors.to_vec(),
    })
}

/// Cleaned text of the first cascade match that actually has text.
pub fn first_text_within(element: ElementRef<'_>, selectors: &[String]) -> Option<String> {
    selectors.iter().filter_map(|raw| compile(raw)).find_map(|selector| {
        element
            .select(&selector)
            .map(|found| clean_text(&found.text().collect::<String>()))
            .find(|text| !text.is_empty())
    })
}

fn compile(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(selector = %raw, error = ?e, "Skipping invalid selector");
            None
        }
    }
}
