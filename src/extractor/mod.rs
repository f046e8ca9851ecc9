//! Detail page content extraction.
//!
//! Two strategies run in order: a reader-mode pass, then a structural
//! fallback over well-known content containers. Whatever a strategy produces
//! is sanitized and must pass [`reject::should_reject`] before it is used.

pub mod cleaner;
pub mod errors;
pub mod model;
pub mod reader;
pub mod reject;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;
pub use model::ReaderOutput;
pub use reader::{ReadabilityReader, Reader};

use tracing::debug;
use url::Url;

/// Extract sanitized article HTML from a detail page.
pub fn extract(html: &str, url: &Url, reader: &dyn Reader) -> Result<String, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    if let Some(content) = from_reader(html, url, reader) {
        debug!(%url, "Extracted content in reader mode");
        return Ok(content);
    }

    if let Some(content) = reader::structural_extract(html).and_then(|raw| accept(&raw, url)) {
        debug!(%url, "Extracted content with structural fallback");
        return Ok(content);
    }

    Err(ExtractError::ExtractionFailed {
        url: url.to_string(),
    })
}

fn from_reader(html: &str, url: &Url, reader: &dyn Reader) -> Option<String> {
    let output = reader.parse(html, url)?;

    if output.has_html() {
        return output.content_html.as_deref().and_then(|raw| accept(raw, url));
    }

    let text = output.text_content.as_deref()?;
    accept(&model::paragraphs_from_text(text), url)
}

fn accept(raw: &str, url: &Url) -> Option<String> {
    let clean = cleaner::sanitize(raw, url);
    if reject::should_reject(&clean) {
        debug!(%url, bytes = clean.len(), "Rejected extracted content");
        None
    } else {
        Some(clean)
    }
}
