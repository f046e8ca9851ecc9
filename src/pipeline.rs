//! One scrape run from listing page to feed file.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::cmp::Reverse;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use url::Url;

use crate::article::{Article, ArticlePreview};
use crate::config::Config;
use crate::error::PipelineError;
use crate::extractor::{self, Reader};
use crate::feed::{self, FeedMeta};
use crate::fetcher::PageFetcher;
use crate::listing::{ListingSelectors, parse_listing};
use crate::tracking::{TrackingRepository, reconcile_now};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub listing_url: Url,
    pub feed_path: PathBuf,
    pub feed_title: String,
    pub max_items: usize,
    pub concurrency: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            listing_url: config.listing_url().clone(),
            feed_path: config.feed_path().to_path_buf(),
            feed_title: config.feed_title().to_string(),
            max_items: config.feed_max_items(),
            concurrency: config.detail_concurrency(),
        }
    }
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub new: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Articles built this run, before the feed limit is applied.
    pub total: usize,
    /// Whether the feed and tracking files were written.
    pub written: bool,
}

pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    reader: Arc<dyn Reader>,
    tracking: Arc<dyn TrackingRepository>,
    selectors: ListingSelectors,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        reader: Arc<dyn Reader>,
        tracking: Arc<dyn TrackingRepository>,
        selectors: ListingSelectors,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher,
            reader,
            tracking,
            selectors,
            settings,
        }
    }

    /// Scrape the listing, build articles, reconcile and write the outputs.
    ///
    /// Losing the listing is fatal. Losing a single article is not: it is
    /// logged and left out. A run that ends up with no articles leaves the
    /// feed and tracking files untouched.
    #[instrument(skip_all, fields(listing = %self.settings.listing_url))]
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let listing_url = &self.settings.listing_url;
        let html = self
            .fetcher
            .fetch_html(listing_url)
            .await
            .map_err(|source| PipelineError::Fetch {
                url: listing_url.to_string(),
                source,
            })?;

        let previews = parse_listing(&html, listing_url, &self.selectors)?;
        if previews.is_empty() {
            info!("Listing has no usable articles, nothing to write");
            return Ok(RunSummary::default());
        }

        let preview_count = previews.len();
        let mut articles: Vec<Article> = stream::iter(previews.into_iter().enumerate())
            .map(|(index, preview)| self.build_article(index, preview))
            .buffered(self.settings.concurrency.max(1))
            .filter_map(|article| async move { article })
            .collect()
            .await;

        info!(
            previews = preview_count,
            articles = articles.len(),
            dropped = preview_count - articles.len(),
            "Built articles"
        );
        if articles.is_empty() {
            info!("No article could be built, nothing to write");
            return Ok(RunSummary::default());
        }

        let prior = self.tracking.load().await?;
        let reconciliation = reconcile_now(&articles, &prior);

        let total = articles.len();
        articles.sort_by_key(|article| Reverse(article.date));
        articles.truncate(self.settings.max_items);

        let meta = FeedMeta {
            title: self.settings.feed_title.clone(),
            link: listing_url.clone(),
            generated_at: Utc::now(),
        };
        feed::write_atom(&self.settings.feed_path, &meta, &articles).await?;
        self.tracking.save(&reconciliation.next_tracking).await?;

        let summary = RunSummary {
            new: reconciliation.new.len(),
            updated: reconciliation.updated.len(),
            unchanged: reconciliation.unchanged_count,
            total,
            written: true,
        };
        info!(
            new = summary.new,
            updated = summary.updated,
            unchanged = summary.unchanged,
            total = summary.total,
            feed_entries = articles.len(),
            "Run complete"
        );
        Ok(summary)
    }

    async fn build_article(&self, index: usize, preview: ArticlePreview) -> Option<Article> {
        let html = match self.fetcher.fetch_html(&preview.link).await {
            Ok(html) => html,
            Err(e) => {
                warn!(index, link = %preview.link, error = %e, "Detail fetch failed, dropping article");
                return None;
            }
        };

        match extractor::extract(&html, &preview.link, self.reader.as_ref()) {
            Ok(content) => Some(Article::from_preview(preview, content)),
            Err(e) => {
                warn!(index, link = %preview.link, error = %e, "Extraction failed, dropping article");
                None
            }
        }
    }
}
