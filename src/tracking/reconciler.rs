use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};

use crate::article::Article;
use crate::tracking::model::{TrackingEntry, TrackingStore};

/// How an article relates to what was tracked before this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    New,
    Updated,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub new: Vec<Article>,
    pub updated: Vec<Article>,
    pub unchanged_count: usize,
    pub next_tracking: TrackingStore,
}

/// Classify `article` against the prior tracking state.
pub fn classify(article: &Article, prior: &TrackingStore) -> Change {
    match prior.get(&article.id) {
        None => Change::New,
        Some(existing) if existing.link != article.link.as_str() => Change::Updated,
        Some(_) => Change::Unchanged,
    }
}

/// [`reconcile`] stamped with the current time, truncated to milliseconds
/// so the result matches what is persisted.
pub fn reconcile_now(articles: &[Article], prior: &TrackingStore) -> Reconciliation {
    reconcile(articles, prior, Utc::now().trunc_subsecs(3))
}

/// Compare this run's articles with `prior` and build the next tracking state.
///
/// Entries that were not seen in this run are carried over untouched. `prior`
/// itself is never modified.
pub fn reconcile(articles: &[Article], prior: &TrackingStore, now: DateTime<Utc>) -> Reconciliation {
    let mut next_tracking = prior.clone();
    let mut new = Vec::new();
    let mut updated = Vec::new();
    let mut unchanged_count = 0;

    for article in articles {
        let change = classify(article, prior);
        debug!(id = %article.id, link = %article.link, ?change, "Classified article");

        match change {
            Change::New | Change::Updated => {
                next_tracking.insert(TrackingEntry {
                    content_hash: article.id.clone(),
                    last_seen: now,
                    link: article.link.to_string(),
                });
                if change == Change::New {
                    new.push(article.clone());
                } else {
                    updated.push(article.clone());
                }
            }
            Change::Unchanged => {
                if let Some(existing) = prior.get(&article.id) {
                    next_tracking.insert(TrackingEntry {
                        last_seen: now,
                        ..existing.clone()
                    });
                }
                unchanged_count += 1;
            }
        }
    }

    info!(
        new = new.len(),
        updated = updated.len(),
        unchanged = unchanged_count,
        tracked = next_tracking.len(),
        "Reconciled tracking state"
    );

    Reconciliation {
        new,
        updated,
        unchanged_count,
        next_tracking,
    }
}
