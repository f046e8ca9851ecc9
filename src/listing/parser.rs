use chrono::Local;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use url::Url;

use crate::article::ArticlePreview;
use crate::dates::{self, DateValue};
use crate::listing::errors::{ElementError, ListingError};
use crate::listing::finder::{find, first_text_within};
use crate::listing::selectors::ListingSelectors;
use crate::text::{clean_text, resolve_url};

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time[datetime]").unwrap());

/// Parse the listing page at `page_url` into previews, in document order.
pub fn parse_listing(
    html: &str,
    page_url: &Url,
    selectors: &ListingSelectors,
) -> Result<Vec<ArticlePreview>, ListingError> {
    parse_listing_at(html, page_url, selectors, Local::now())
}

/// Like [`parse_listing`], resolving relative dates against `now`.
pub fn parse_listing_at(
    html: &str,
    page_url: &Url,
    selectors: &ListingSelectors,
    now: DateValue,
) -> Result<Vec<ArticlePreview>, ListingError> {
    if html.trim().is_empty() {
        return Err(ListingError::EmptyInput);
    }

    let document = Html::parse_document(html);
    let elements = find(&document, &selectors.articles)?;
    let candidates = elements.len();

    let mut previews = Vec::with_capacity(candidates);
    for (index, element) in elements.into_iter().enumerate() {
        match parse_element(element, page_url, selectors, now) {
            Ok(Some(preview)) => previews.push(preview),
            Ok(None) => debug!(index, "Skipping listing element without title"),
            Err(e) => warn!(index, error = %e, "Skipping malformed listing element"),
        }
    }

    info!(
        candidates,
        previews = previews.len(),
        url = %page_url,
        "Parsed listing page"
    );
    Ok(previews)
}

fn parse_element(
    element: ElementRef<'_>,
    page_url: &Url,
    selectors: &ListingSelectors,
    now: DateValue,
) -> Result<Option<ArticlePreview>, ElementError> {
    let Some(title) = first_text_within(element, &selectors.titles) else {
        return Ok(None);
    };

    let href = link_of(element).ok_or(ElementError::MissingLink)?;
    let link = resolve_url(href, page_url).ok_or_else(|| ElementError::InvalidLink(href.to_string()))?;

    let description = first_text_within(element, &selectors.descriptions)
        .or_else(|| fallback_paragraph(element))
        .unwrap_or_else(|| title.clone());

    let date = dates::parse_at(&date_text(element, selectors), now);

    Ok(Some(ArticlePreview {
        title,
        link,
        description,
        date,
    }))
}

fn link_of<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    if element.value().name() == "a"
        && let Some(href) = element.value().attr("href")
    {
        return Some(href);
    }
    element
        .select(&ANCHOR_SELECTOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
}

/// First paragraph that is not a date line.
fn fallback_paragraph(element: ElementRef<'_>) -> Option<String> {
    element
        .select(&PARAGRAPH_SELECTOR)
        .filter(|p| {
            let class = p.value().attr("class").unwrap_or_default();
            !class.contains("date") && !class.contains("published")
        })
        .map(|p| clean_text(&p.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn date_text(element: ElementRef<'_>, selectors: &ListingSelectors) -> String {
    if let Some(datetime) = element
        .select(&TIME_SELECTOR)
        .next()
        .and_then(|time| time.value().attr("datetime"))
        .filter(|value| !value.trim().is_empty())
    {
        return datetime.trim().to_string();
    }

    first_text_within(element, &selectors.dates)
        .unwrap_or_else(|| clean_text(&element.text().collect::<String>()))
}
