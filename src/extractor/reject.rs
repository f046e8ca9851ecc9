use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use crate::text::clean_text;

pub const MIN_CONTENT_LENGTH: usize = 20;

static WORD_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w{3,}").unwrap());

/// Text of an HTML fragment with all markup removed.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    clean_text(&fragment.root_element().text().collect::<String>())
}

/// Reject content that is too short or has no real words in it.
pub fn should_reject(html: &str) -> bool {
    let text = plain_text(html);
    text.chars().count() < MIN_CONTENT_LENGTH || !WORD_RUN_REGEX.is_match(&text)
}
