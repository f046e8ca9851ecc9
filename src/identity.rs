//! Content-addressed article identity.
//!
//! An article's id is the MD5 digest of `"<YYYY-MM-DD>|<content>"`, so the
//! same text published on the same calendar day always maps to the same id,
//! no matter when during that day it was scraped.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const HASH_LEN: usize = 32;

/// 32 lowercase hex characters identifying an article.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid content hash {0:?}: expected 32 lowercase hex characters")]
pub struct InvalidContentHash(pub String);

impl ContentHash {
    /// Validate an existing hash string.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidContentHash> {
        let value = value.into();
        let well_formed = value.len() == HASH_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(InvalidContentHash(value))
        }
    }

    /// Wrap a string without validation. Callers must guarantee the format.
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = InvalidContentHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the id of `content` published on `date`'s calendar day.
pub fn generate<Tz: TimeZone>(content: &str, date: &DateTime<Tz>) -> ContentHash {
    let input = format!("{}|{}", date.date_naive().format("%Y-%m-%d"), content);
    ContentHash(format!("{:x}", md5::compute(input.as_bytes())))
}
