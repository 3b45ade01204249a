//! Create the planning store.

use crate::cli::ok;
use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    reapplied: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the database exists (without `--force`) or the
/// schema cannot be applied.
pub fn execute(db_path: Option<&Path>, force: bool, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path);
    let existed = db_path.exists();

    // Dropped right away; init only needs the schema on disk.
    drop(SqliteStorage::create(&db_path, force)?);

    if json {
        let output = InitOutput {
            database: db_path,
            reapplied: existed,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if existed {
        ok(&format!("Re-applied schema to {}", db_path.display()));
    } else {
        ok(&format!("Initialized database at {}", db_path.display()));
    }

    Ok(())
}
