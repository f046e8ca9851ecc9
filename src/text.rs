//! Text and link helpers shared by the listing parser and the extractor.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Decode leftover HTML entities and collapse every whitespace run to one space.
pub fn clean_text(text: &str) -> String {
    let decoded = html_escape::decode_html_entities(text);
    WHITESPACE_REGEX
        .replace_all(&decoded, " ")
        .trim()
        .to_string()
}

/// Scheme, host and port of `url` as a URL of its own (`https://host/`).
pub fn site_origin(url: &Url) -> Option<Url> {
    Url::parse(&url.origin().ascii_serialization()).ok()
}

/// Resolve an `href` found on `page_url` into an absolute URL.
///
/// Root-relative paths are resolved against the site origin, other relative
/// paths against the page itself. Absolute URLs pass through. Returns `None`
/// when the result is not a usable http(s) URL.
pub fn resolve_url(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(_) if href.starts_with('/') && !href.starts_with("//") => {
            site_origin(page_url)?.join(href).ok()?
        }
        Err(_) => page_url.join(href).ok()?,
    };

    is_valid_url(&resolved).then_some(resolved)
}

/// True for absolute http(s) URLs with a host.
pub fn is_valid_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
