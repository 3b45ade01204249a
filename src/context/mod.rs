//! Master context updates.
//!
//! An update runs in two steps:
//! 1. Serialize the document and overwrite the context file.
//! 2. Open the store, upsert the context row and append a snapshot of the
//!    exact same text, all in one transaction.
//!
//! The file is written before the store is opened, so a store failure
//! still leaves the new file on disk.

pub mod file;
pub mod label;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::model::{ContextDocument, LabelMode};
use crate::storage::{ContextSyncOutcome, ContextWrite, SqliteStorage};

/// Default logical name of the context row.
pub const DEFAULT_CONTEXT_ID: &str = "master_context";

/// Default session label recorded on snapshots.
pub const DEFAULT_SESSION_ID: &str = "session-2025-11-07-cmos-analysis";

/// Where and how one update is recorded.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Context file to overwrite; also stored as the row's source path
    pub output: PathBuf,
    pub context_id: String,
    pub session_id: String,
    pub label_mode: LabelMode,
}

impl UpdateOptions {
    /// Options with the default context id, session label and label mode.
    #[must_use]
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            context_id: DEFAULT_CONTEXT_ID.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            label_mode: LabelMode::default(),
        }
    }
}

/// What an update wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ContextUpdateReport {
    pub path: PathBuf,
    pub context_id: String,
    /// True if the context row was inserted rather than updated
    pub created: bool,
    pub snapshot_id: i64,
    pub content_hash: String,
    /// Which kind of label `content_hash` holds
    pub label_mode: &'static str,
    pub updated_at: String,
}

/// RFC 3339 with microseconds and a `+00:00` offset.
#[must_use]
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Serialize `document` and overwrite the context file with it.
///
/// Returns the exact text written.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_document(path: &Path, document: &ContextDocument) -> Result<String> {
    let content = document.to_pretty_json()?;
    file::overwrite(path, &content)?;
    info!(path = %path.display(), bytes = content.len(), "Wrote context file");
    Ok(content)
}

/// Record already-serialized content in the store.
///
/// # Errors
///
/// Returns a database error if the upsert or snapshot insert fails.
pub fn record_snapshot(
    storage: &mut SqliteStorage,
    content: &str,
    options: &UpdateOptions,
    now: DateTime<Utc>,
) -> Result<ContextUpdateReport> {
    let timestamp = format_timestamp(now);
    let content_hash = label::content_label(options.label_mode, content, now);
    let source_path = options.output.display().to_string();

    let ContextSyncOutcome {
        created,
        snapshot_id,
    } = storage.sync_context(&ContextWrite {
        context_id: &options.context_id,
        source_path: &source_path,
        session_id: &options.session_id,
        content_hash: &content_hash,
        content,
        timestamp: &timestamp,
    })?;

    info!(
        context_id = %options.context_id,
        snapshot_id,
        created,
        "Recorded context snapshot"
    );

    Ok(ContextUpdateReport {
        path: options.output.clone(),
        context_id: options.context_id.clone(),
        created,
        snapshot_id,
        content_hash,
        label_mode: options.label_mode.as_str(),
        updated_at: timestamp,
    })
}

/// Write the document file, then sync it into the store at `db_path`.
///
/// The store connection is opened after the file write and closed before
/// returning, whether or not the sync succeeds.
///
/// # Errors
///
/// Returns an error if the file write, store open or sync fails.
pub fn update_context(
    db_path: &Path,
    document: &ContextDocument,
    options: &UpdateOptions,
) -> Result<ContextUpdateReport> {
    let content = write_document(&options.output, document)?;

    let mut storage = SqliteStorage::open(db_path)?;
    record_snapshot(&mut storage, &content, options, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 7, 22, 30, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(at()), "2025-11-07T22:30:00.000000+00:00");
    }

    #[test]
    fn test_update_twice_upserts_and_appends() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("cmos.sqlite");
        SqliteStorage::create(&db_path, false).unwrap();

        let document = ContextDocument::builtin().unwrap();
        let options = UpdateOptions::new(temp.path().join("MASTER_CONTEXT.json"));

        let first = update_context(&db_path, &document, &options).unwrap();
        assert!(first.created);
        assert!(first.content_hash.starts_with("snapshot_"));
        assert_eq!(first.label_mode, "timestamp");

        let second = update_context(&db_path, &document, &options).unwrap();
        assert!(!second.created);

        let storage = SqliteStorage::open(&db_path).unwrap();
        let rows: i64 = storage
            .conn()
            .query_row("SELECT COUNT(*) FROM contexts WHERE id = 'master_context'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(storage.count_snapshots(DEFAULT_CONTEXT_ID).unwrap(), 2);
    }

    #[test]
    fn test_snapshot_matches_file() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("cmos.sqlite");
        SqliteStorage::create(&db_path, false).unwrap();

        let document = ContextDocument::builtin().unwrap();
        let mut options = UpdateOptions::new(temp.path().join("ctx").join("MASTER_CONTEXT.json"));
        options.session_id = "session-unit".to_string();

        let report = update_context(&db_path, &document, &options).unwrap();

        let on_disk = std::fs::read_to_string(&options.output).unwrap();
        let storage = SqliteStorage::open(&db_path).unwrap();
        let snapshot = &storage.list_snapshots(DEFAULT_CONTEXT_ID, 1).unwrap()[0];
        assert_eq!(snapshot.id, report.snapshot_id);
        assert_eq!(snapshot.content, on_disk);
        assert_eq!(snapshot.session_id, "session-unit");
        assert_eq!(snapshot.source, options.output.display().to_string());

        let record = storage.get_context(DEFAULT_CONTEXT_ID).unwrap().unwrap();
        assert_eq!(record.content, on_disk);
        assert_eq!(record.updated_at, snapshot.created_at);

        let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed["project"]["name"], "CMOS Starter Template");
        assert_eq!(parsed["sprint_tracking"]["current_sprint"], "sprint-09");
    }

    #[test]
    fn test_record_snapshot_sha256_label() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut options = UpdateOptions::new("MASTER_CONTEXT.json");
        options.label_mode = LabelMode::Sha256;

        let report = record_snapshot(&mut storage, "{}", &options, at()).unwrap();
        assert_eq!(report.content_hash, format!("sha256:{}", label::content_digest("{}")));
        assert_eq!(report.label_mode, "sha256");
        assert_eq!(report.updated_at, "2025-11-07T22:30:00.000000+00:00");
    }

    #[test]
    fn test_missing_store_still_writes_file() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("missing.sqlite");
        let options = UpdateOptions::new(temp.path().join("MASTER_CONTEXT.json"));

        let err = update_context(&db_path, &ContextDocument::builtin().unwrap(), &options)
            .unwrap_err();
        assert!(matches!(err, crate::Error::NotInitialized { .. }));
        assert!(options.output.exists());
        assert!(!db_path.exists());
    }
}
