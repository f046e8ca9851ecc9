//! Configuration handling for the scraper.
//!
//! Everything is read from environment variables with defaults that target
//! the Karlsruhe news page. `Config::from_env` validates numbers and URLs up
//! front so a bad deployment fails before any network traffic.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetcher::FetchSettings;
use crate::listing::ListingSelectors;
use crate::text::is_valid_url;

pub const ENV_LISTING_URL: &str = "LISTING_URL";
pub const ENV_FEED_PATH: &str = "FEED_PATH";
pub const ENV_TRACKING_PATH: &str = "TRACKING_PATH";
pub const ENV_FEED_TITLE: &str = "FEED_TITLE";
pub const ENV_FEED_MAX_ITEMS: &str = "FEED_MAX_ITEMS";
pub const ENV_FETCH_RETRIES: &str = "FETCH_RETRIES";
pub const ENV_FETCH_RETRY_DELAY_MS: &str = "FETCH_RETRY_DELAY_MS";
pub const ENV_FETCH_TIMEOUT_MS: &str = "FETCH_TIMEOUT_MS";
pub const ENV_DETAIL_CONCURRENCY: &str = "DETAIL_CONCURRENCY";
pub const ENV_SELECTORS_PATH: &str = "SELECTORS_PATH";

const DEFAULT_LISTING_URL: &str = "https://www.karlsruhe.de/aktuelles";
const DEFAULT_FEED_PATH: &str = "public/feed.xml";
const DEFAULT_TRACKING_PATH: &str = "data/tracking.json";
const DEFAULT_FEED_TITLE: &str = "Stadt Karlsruhe – Aktuelles";
const DEFAULT_FEED_MAX_ITEMS: usize = 50;
const DEFAULT_FETCH_RETRIES: u32 = 3;
const DEFAULT_FETCH_RETRY_DELAY_MS: u64 = 1000;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_DETAIL_CONCURRENCY: usize = 4;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    listing_url: Url,
    feed_path: PathBuf,
    tracking_path: PathBuf,
    feed_title: String,
    feed_max_items: usize,
    fetch: FetchSettings,
    detail_concurrency: usize,
    selectors_path: Option<PathBuf>,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listing_url = parse_listing_url(&string_var(ENV_LISTING_URL, DEFAULT_LISTING_URL))?;
        let feed_path = PathBuf::from(string_var(ENV_FEED_PATH, DEFAULT_FEED_PATH));
        let tracking_path = PathBuf::from(string_var(ENV_TRACKING_PATH, DEFAULT_TRACKING_PATH));
        let feed_title = string_var(ENV_FEED_TITLE, DEFAULT_FEED_TITLE);

        let feed_max_items = parsed_var(ENV_FEED_MAX_ITEMS, DEFAULT_FEED_MAX_ITEMS)?;
        if feed_max_items == 0 {
            return Err(ConfigError::invalid(ENV_FEED_MAX_ITEMS, "must be at least 1"));
        }

        let detail_concurrency = parsed_var(ENV_DETAIL_CONCURRENCY, DEFAULT_DETAIL_CONCURRENCY)?;
        if detail_concurrency == 0 {
            return Err(ConfigError::invalid(ENV_DETAIL_CONCURRENCY, "must be at least 1"));
        }

        let fetch = FetchSettings {
            retries: parsed_var(ENV_FETCH_RETRIES, DEFAULT_FETCH_RETRIES)?,
            retry_delay: Duration::from_millis(parsed_var(
                ENV_FETCH_RETRY_DELAY_MS,
                DEFAULT_FETCH_RETRY_DELAY_MS,
            )?),
            timeout: Duration::from_millis(parsed_var(ENV_FETCH_TIMEOUT_MS, DEFAULT_FETCH_TIMEOUT_MS)?),
        };
        if fetch.timeout.is_zero() {
            return Err(ConfigError::invalid(ENV_FETCH_TIMEOUT_MS, "must be positive"));
        }

        let selectors_path = env::var(ENV_SELECTORS_PATH)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listing_url,
            feed_path,
            tracking_path,
            feed_title,
            feed_max_items,
            fetch,
            detail_concurrency,
            selectors_path,
        })
    }

    /// Listing page to scrape. Its origin is the site origin.
    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }
    pub fn feed_path(&self) -> &Path {
        &self.feed_path
    }
    pub fn tracking_path(&self) -> &Path {
        &self.tracking_path
    }
    pub fn feed_title(&self) -> &str {
        &self.feed_title
    }
    /// Upper bound on entries written to the feed.
    pub fn feed_max_items(&self) -> usize {
        self.feed_max_items
    }
    pub fn fetch(&self) -> &FetchSettings {
        &self.fetch
    }
    /// Detail pages fetched at the same time.
    pub fn detail_concurrency(&self) -> usize {
        self.detail_concurrency
    }

    /// Listing selectors, read from `SELECTORS_PATH` when set.
    ///
    /// Lists missing from the file keep their defaults.
    pub fn load_selectors(&self) -> Result<ListingSelectors, ConfigError> {
        let Some(path) = &self.selectors_path else {
            return Ok(ListingSelectors::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::invalid(ENV_SELECTORS_PATH, format!("{}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            ConfigError::invalid(ENV_SELECTORS_PATH, format!("{}: {e}", path.display()))
        })
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

fn string_var(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(key, format!("{raw:?}: {e}"))),
        _ => Ok(default),
    }
}

fn parse_listing_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::invalid(ENV_LISTING_URL, format!("{raw:?}: {e}")))?;
    if !is_valid_url(&url) {
        return Err(ConfigError::invalid(ENV_LISTING_URL, "must be an absolute http(s) URL"));
    }
    Ok(url)
}
