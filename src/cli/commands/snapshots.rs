//! Snapshots command implementation.

use crate::config::{resolve_db_path, validate_limit};
use crate::error::Result;
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SnapshotItem {
    id: i64,
    session_id: String,
    source: String,
    content_hash: String,
    size: usize,
    created_at: String,
}

#[derive(Serialize)]
struct SnapshotListOutput {
    context_id: String,
    snapshots: Vec<SnapshotItem>,
    count: usize,
    total: i64,
}

/// Execute the snapshots command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or queried.
pub fn execute(db_path: Option<&Path>, context_id: &str, limit: u32, json: bool) -> Result<()> {
    let limit = validate_limit(limit)?;
    let storage = SqliteStorage::open(&resolve_db_path(db_path))?;

    let total = storage.count_snapshots(context_id)?;
    let snapshots: Vec<SnapshotItem> = storage
        .list_snapshots(context_id, limit)?
        .into_iter()
        .map(|s| SnapshotItem {
            id: s.id,
            session_id: s.session_id,
            source: s.source,
            content_hash: s.content_hash,
            size: s.content.len(),
            created_at: s.created_at,
        })
        .collect();

    if json {
        let output = SnapshotListOutput {
            context_id: context_id.to_string(),
            count: snapshots.len(),
            snapshots,
            total,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No snapshots for {context_id}.");
        return Ok(());
    }

    println!("Snapshots of {context_id} ({} of {total}):", snapshots.len());
    println!();
    for s in &snapshots {
        println!(
            "  #{:<4} {}  {}  {} bytes  [{}]",
            s.id, s.created_at, s.content_hash, s.size, s.session_id
        );
    }

    Ok(())
}
