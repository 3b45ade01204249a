//! Snapshot content labels.
//!
//! The `content_hash` column historically holds a timestamp label rather
//! than a digest. `LabelMode::Sha256` stores a real SHA-256 of the content.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::LabelMode;

/// Build the label for a snapshot taken at `now` of `content`.
#[must_use]
pub fn content_label(mode: LabelMode, content: &str, now: DateTime<Utc>) -> String {
    match mode {
        LabelMode::Timestamp => timestamp_label(now),
        LabelMode::Sha256 => format!("sha256:{}", content_digest(content)),
    }
}

/// `snapshot_YYYYMMDD_HHMMSS` in UTC.
#[must_use]
pub fn timestamp_label(now: DateTime<Utc>) -> String {
    now.format("snapshot_%Y%m%d_%H%M%S").to_string()
}

/// Hex SHA-256 of the serialized content.
#[must_use]
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
