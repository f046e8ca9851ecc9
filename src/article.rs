use url::Url;

use crate::dates::DateValue;
use crate::identity::{self, ContentHash};

/// What the listing page tells us about an article.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticlePreview {
    pub title: String,
    pub link: Url,
    pub description: String,
    pub date: DateValue,
}

/// A preview completed with its extracted detail content.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: ContentHash,
    pub title: String,
    pub link: Url,
    pub description: String,
    pub date: DateValue,
    pub content: String,
}

impl Article {
    /// The id is always derived from `content` and the preview's date.
    pub fn from_preview(preview: ArticlePreview, content: String) -> Self {
        let id = identity::generate(&content, &preview.date);
        Self {
            id,
            title: preview.title,
            link: preview.link,
            description: preview.description,
            date: preview.date,
            content,
        }
    }
}
