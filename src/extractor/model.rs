use regex::Regex;
use std::sync::LazyLock;

use crate::text::clean_text;

static BLANK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// What a reader-mode pass found in a document. Any part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOutput {
    pub title: Option<String>,
    pub content_html: Option<String>,
    pub text_content: Option<String>,
}

impl ReaderOutput {
    pub fn has_html(&self) -> bool {
        self.content_html
            .as_deref()
            .is_some_and(|html| !html.trim().is_empty())
    }
}

/// Turn plain reader text into `<p>` paragraphs.
///
/// Blocks are separated by blank lines. If that yields a single block but
/// the text still has line breaks, every line becomes its own paragraph.
pub fn paragraphs_from_text(text: &str) -> String {
    let mut blocks = clean_blocks(BLANK_LINE_REGEX.split(text));
    if blocks.len() <= 1 && text.trim().contains('\n') {
        blocks = clean_blocks(text.lines());
    }

    blocks
        .iter()
        .map(|block| format!("<p>{}</p>", html_escape::encode_text(block)))
        .collect()
}

fn clean_blocks<'a>(blocks: impl Iterator<Item = &'a str>) -> Vec<String> {
    blocks
        .map(clean_text)
        .filter(|block| !block.is_empty())
        .collect()
}
