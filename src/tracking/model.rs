use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::identity::ContentHash;
use crate::text::is_valid_url;
use crate::tracking::errors::TrackingError;

/// Last sighting of an article.
///
/// Only the three persisted fields are accepted, and `lastSeen` must already be
/// in the form it is written back in, so entries a run does not touch are saved
/// byte for byte as they were loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TrackingEntry {
    pub content_hash: ContentHash,
    #[serde(with = "iso_millis")]
    pub last_seen: DateTime<Utc>,
    pub link: String,
}

/// Persisted mapping from content hash to its [`TrackingEntry`].
///
/// Every key equals its entry's `content_hash`. Stores are only built through
/// [`TrackingStore::from_json`] or by inserting entries, both of which keep
/// that invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackingStore {
    entries: BTreeMap<ContentHash, TrackingEntry>,
}

impl TrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &ContentHash) -> Option<&TrackingEntry> {
        self.entries.get(hash)
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.entries.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentHash, &TrackingEntry)> {
        self.entries.iter()
    }

    /// Insert or replace the entry stored under its own hash.
    pub fn insert(&mut self, entry: TrackingEntry) {
        self.entries.insert(entry.content_hash.clone(), entry);
    }

    /// Parse and validate persisted tracking JSON.
    pub fn from_json(json: &str) -> Result<Self, TrackingError> {
        let entries: BTreeMap<ContentHash, TrackingEntry> =
            serde_json::from_str(json).map_err(|e| TrackingError::Validation(e.to_string()))?;

        for (key, entry) in &entries {
            if *key != entry.content_hash {
                return Err(TrackingError::Validation(format!(
                    "key {key} does not match contentHash {}",
                    entry.content_hash
                )));
            }
            let link_ok = Url::parse(&entry.link).is_ok_and(|url| is_valid_url(&url));
            if !link_ok {
                return Err(TrackingError::Validation(format!(
                    "entry {key} has invalid link {:?}",
                    entry.link
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn to_json(&self) -> Result<String, TrackingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g.
/// `2025-12-09T10:00:00.000Z`. Any other spelling is rejected on load.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let parsed = DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)?;
        if parsed.to_rfc3339_opts(SecondsFormat::Millis, true) != raw {
            return Err(de::Error::custom(format!(
                "lastSeen {raw:?} is not in YYYY-MM-DDTHH:MM:SS.mmmZ form"
            )));
        }
        Ok(parsed)
    }
}
