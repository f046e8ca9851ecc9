use serde::{Deserialize, Serialize};

/// Ordered selector cascades used on the listing page.
///
/// Each list is tried front to back and the first selector that matches
/// wins. Site-specific classes come first, generic fallbacks last, so markup
/// drift is handled by editing these lists (or a JSON override file) rather
/// than the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    pub articles: Vec<String>,
    pub titles: Vec<String>,
    pub descriptions: Vec<String>,
    pub dates: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            articles: owned(&[
                ".c-news-list__item",
                ".news-list-item",
                ".newslist .item",
                ".news-item",
                ".c-teaser",
                ".teaser",
                "article",
                "[itemtype*='NewsArticle']",
                "[class*='news'] li",
            ]),
            titles: owned(&[
                ".c-teaser__headline",
                ".news-title",
                "h2",
                "h3",
                "h4",
                ".title",
                ".headline",
                "a[title]",
            ]),
            descriptions: owned(&[
                ".c-teaser__text",
                ".news-teaser",
                ".teaser-text",
                ".description",
                ".summary",
                ".abstract",
            ]),
            dates: owned(&[
                ".c-teaser__date",
                ".news-date",
                ".date",
                ".published",
                "[class*='date']",
                "time",
            ]),
        }
    }
}
