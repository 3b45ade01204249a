//! Configuration management.
//!
//! Resolves the store and context file locations and loads the sprint plan
//! and context document. Every procedure receives these as parameters, so
//! tests can point them at temporary directories.
//!
//! Paths default to the project-relative layout:
//! - **Database**: `cmos/db/cmos.sqlite`
//! - **Context file**: `cmos/context/MASTER_CONTEXT.json`

use crate::error::{Error, Result};
use crate::model::{ContextDocument, SprintPlan};

use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-relative default database location.
pub const DEFAULT_DB_PATH: &str = "cmos/db/cmos.sqlite";

/// Project-relative default context file location.
pub const DEFAULT_CONTEXT_PATH: &str = "cmos/context/MASTER_CONTEXT.json";

/// Read a non-empty environment variable.
fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Resolve the database path.
///
/// Priority:
/// 1. `explicit_path` (the `--db` flag)
/// 2. `CMOS_DB` environment variable
/// 3. `cmos/db/cmos.sqlite` relative to the working directory
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> PathBuf {
    explicit_path
        .map(Path::to_path_buf)
        .or_else(|| env_path("CMOS_DB"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
}

/// Resolve the context file path.
///
/// Priority:
/// 1. `explicit_path` (the `--output` flag)
/// 2. `CMOS_CONTEXT_PATH` environment variable
/// 3. `cmos/context/MASTER_CONTEXT.json` relative to the working directory
#[must_use]
pub fn resolve_context_path(explicit_path: Option<&Path>) -> PathBuf {
    explicit_path
        .map(Path::to_path_buf)
        .or_else(|| env_path("CMOS_CONTEXT_PATH"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTEXT_PATH))
}

/// Read a JSON data file, attaching the path to parse errors.
fn read_data_file<T>(path: &Path, parse: fn(&str) -> serde_json::Result<T>) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    parse(&text).map_err(|source| Error::DataFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the sprint plan from `path`, or the built-in plan if `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_plan(path: Option<&Path>) -> Result<SprintPlan> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading sprint plan");
            read_data_file(path, SprintPlan::from_json)
        }
        None => Ok(SprintPlan::builtin()?),
    }
}

/// Load the context document from `path`, or the built-in one if `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_document(path: Option<&Path>) -> Result<ContextDocument> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading context document");
            read_data_file(path, ContextDocument::from_json)
        }
        None => Ok(ContextDocument::builtin()?),
    }
}

/// Validate a snapshot listing limit.
///
/// # Errors
///
/// Returns `Config` if the limit is zero.
pub fn validate_limit(limit: u32) -> Result<u32> {
    if limit == 0 {
        return Err(Error::Config("--limit must be at least 1".to_string()));
    }
    Ok(limit)
}
