//! Database schema definitions.
//!
//! The schema is applied only by `cmos init`. Seeding and context updates
//! expect it to exist already and fail with a database error otherwise.

use rusqlite::{Connection, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the planning store.
///
/// Timestamps are RFC 3339 text in UTC; dates are `YYYY-MM-DD` text.
pub const SCHEMA_SQL: &str = r"
-- ====================
-- Schema Version Tracking
-- ====================

CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

-- ====================
-- Planning
-- ====================

-- Sprints: time-boxed batches of missions
CREATE TABLE IF NOT EXISTS sprints (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    focus TEXT,
    status TEXT NOT NULL DEFAULT 'planning',
    start_date TEXT,
    end_date TEXT,
    total_missions INTEGER NOT NULL DEFAULT 0,
    completed_missions INTEGER NOT NULL DEFAULT 0
);

-- Missions: one planned unit of work, owned by exactly one sprint
CREATE TABLE IF NOT EXISTS missions (
    id TEXT PRIMARY KEY,
    sprint_id TEXT NOT NULL,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'queued',
    notes TEXT,
    FOREIGN KEY (sprint_id) REFERENCES sprints(id)
);

CREATE INDEX IF NOT EXISTS idx_missions_sprint ON missions(sprint_id);
CREATE INDEX IF NOT EXISTS idx_missions_status ON missions(status);

-- ====================
-- Context
-- ====================

-- Contexts: the live document, one row per logical name
CREATE TABLE IF NOT EXISTS contexts (
    id TEXT PRIMARY KEY,
    source_path TEXT NOT NULL,
    content TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Context Snapshots: append-only history of context content
CREATE TABLE IF NOT EXISTS context_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    context_id TEXT NOT NULL,
    session_id TEXT,
    source TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_context_snapshots_context ON context_snapshots(context_id, id DESC);
";

/// Set per-connection pragmas.
///
/// Foreign keys are off by default in SQLite, so every connection that
/// writes missions needs this.
///
/// # Errors
///
/// Returns an error if a pragma cannot be set.
pub fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    Ok(())
}

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    apply_pragmas(conn)?;

    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    Ok(())
}

/// Check whether the planning tables exist.
///
/// # Errors
///
/// Returns an error if `sqlite_master` cannot be queried.
pub fn has_schema(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type = 'table' AND name IN ('sprints', 'missions', 'contexts', 'context_snapshots')",
        [],
        |row| row.get(0),
    )?;
    Ok(count == 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!has_schema(&conn).unwrap());

        apply_schema(&conn).expect("Failed to apply schema");

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"sprints".to_string()));
        assert!(tables.contains(&"missions".to_string()));
        assert!(tables.contains(&"contexts".to_string()));
        assert!(tables.contains(&"context_snapshots".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
        assert!(has_schema(&conn).unwrap());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        apply_schema(&conn).expect("First apply failed");
        apply_schema(&conn).expect("Second apply failed");

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[test]
    fn test_mission_requires_sprint() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO missions (id, sprint_id, name, status) VALUES ('m1', 'nope', 'M', 'queued')",
            [],
        );
        assert!(result.is_err());
    }
}
