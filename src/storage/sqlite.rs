//! SQLite storage implementation.
//!
//! All writes go through [`SqliteStorage::mutate`], which wraps the work in
//! a single IMMEDIATE transaction. A closure that returns an error drops the
//! transaction uncommitted, so nothing from that run persists.

use crate::error::{Error, Result};
use crate::model::{ContextRecord, ContextSnapshot, MissionRecord, Sprint, SprintPlan};
use crate::storage::schema::{apply_pragmas, apply_schema};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// How long a writer waits on another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based storage backend.
///
/// Owns exactly one connection; dropping the storage closes it.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Result of seeding a sprint plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub sprint_id: String,
    pub title: String,
    pub missions_inserted: usize,
}

/// Everything written to the store by one context update.
#[derive(Debug, Clone, Copy)]
pub struct ContextWrite<'a> {
    /// Logical name of the context row (e.g., "master_context")
    pub context_id: &'a str,
    /// Path of the file the content was written to
    pub source_path: &'a str,
    /// Session label recorded on the snapshot
    pub session_id: &'a str,
    /// Label stored in `context_snapshots.content_hash`
    pub content_hash: &'a str,
    /// Serialized document
    pub content: &'a str,
    /// RFC 3339 timestamp shared by every write of this update
    pub timestamp: &'a str,
}

/// Outcome of a context sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSyncOutcome {
    /// True if the context row did not exist before this update.
    pub created: bool,
    /// Row id of the appended snapshot.
    pub snapshot_id: i64,
}

/// Mission counts for one sprint, grouped by status label.
#[derive(Debug, Clone, Serialize)]
pub struct SprintProgress {
    pub sprint: Sprint,
    pub mission_status: Vec<(String, i64)>,
}

impl SqliteStorage {
    /// Open an existing, initialized database.
    ///
    /// The file is never created here; use [`SqliteStorage::create`] for that.
    /// The schema is not applied either, so a file without tables opens fine
    /// and fails on the first statement that needs them.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if the file does not exist, or a database
    /// error if the connection cannot be established.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotInitialized {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_pragmas(&conn)?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    /// Create a database file (and parent directories) and apply the schema.
    ///
    /// With `force`, an existing file is kept and the idempotent schema is
    /// re-applied to it.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if the file exists and `force` is false,
    /// or an error if the directory, file or schema cannot be created.
    pub fn create(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(Error::AlreadyInitialized {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        apply_schema(&conn)?;
        info!(path = %path.display(), "Applied schema");
        Ok(Self { conn })
    }

    /// Open an in-memory database with the schema applied (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation inside one IMMEDIATE transaction.
    ///
    /// Commits only if the closure succeeds. On error the transaction is
    /// dropped, which discards every statement it ran.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a database error from begin/commit.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        debug!(op, "Begin transaction");
        let result = f(&tx)?;

        tx.commit()?;
        debug!(op, "Committed");

        Ok(result)
    }

    // ==================
    // Sprint Operations
    // ==================

    /// Insert a sprint and all its missions atomically.
    ///
    /// Every mission gets `sprint_id = plan.sprint.id`. Identifiers are
    /// inserted, never upserted: a duplicate sprint or mission id fails the
    /// whole plan.
    ///
    /// # Errors
    ///
    /// Returns a database error on any constraint violation or missing table.
    pub fn seed_sprint(&mut self, plan: &SprintPlan) -> Result<SeedReport> {
        let sprint = &plan.sprint;

        self.mutate("seed_sprint", |tx| {
            tx.execute(
                "INSERT INTO sprints (id, title, focus, status, start_date, end_date, total_missions, completed_missions)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    sprint.id,
                    sprint.title,
                    sprint.focus,
                    sprint.status,
                    sprint.start_date,
                    sprint.end_date,
                    sprint.total_missions,
                    sprint.completed_missions,
                ],
            )?;

            let mut stmt = tx.prepare(
                "INSERT INTO missions (id, sprint_id, name, status, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for mission in &plan.missions {
                debug!(mission = %mission.id, "Inserting mission");
                stmt.execute(rusqlite::params![
                    mission.id,
                    sprint.id,
                    mission.name,
                    mission.status,
                    mission.notes,
                ])?;
            }

            Ok(SeedReport {
                sprint_id: sprint.id.clone(),
                title: sprint.title.clone(),
                missions_inserted: plan.missions.len(),
            })
        })
    }

    /// List all sprints ordered by start date, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sprints(&self) -> Result<Vec<Sprint>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, focus, status, start_date, end_date, total_missions, completed_missions
             FROM sprints ORDER BY start_date ASC, id ASC",
        )?;
        let rows = stmt.query_map([], map_sprint)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// List the missions of a sprint in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_missions(&self, sprint_id: &str) -> Result<Vec<MissionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sprint_id, name, status, COALESCE(notes, '')
             FROM missions WHERE sprint_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([sprint_id], |row| {
            Ok(MissionRecord {
                id: row.get(0)?,
                sprint_id: row.get(1)?,
                name: row.get(2)?,
                status: row.get(3)?,
                notes: row.get(4)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Every sprint with its missions counted by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sprint_progress(&self) -> Result<Vec<SprintProgress>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM missions
             WHERE sprint_id = ?1 GROUP BY status ORDER BY status ASC",
        )?;

        let mut progress = Vec::new();
        for sprint in self.list_sprints()? {
            let mission_status = stmt
                .query_map([&sprint.id], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            progress.push(SprintProgress {
                sprint,
                mission_status,
            });
        }
        Ok(progress)
    }

    // ==================
    // Context Operations
    // ==================

    /// Upsert the context row and append a snapshot, in one transaction.
    ///
    /// An existing row keeps its `source_path`; only `content` and
    /// `updated_at` change. The snapshot is appended on every call.
    ///
    /// # Errors
    ///
    /// Returns a database error if any statement fails; nothing is written
    /// in that case.
    pub fn sync_context(&mut self, write: &ContextWrite<'_>) -> Result<ContextSyncOutcome> {
        self.mutate("sync_context", |tx| {
            let exists = tx
                .prepare("SELECT 1 FROM contexts WHERE id = ?1")?
                .exists([write.context_id])?;

            tx.execute(
                "INSERT INTO contexts (id, source_path, content, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                   content = excluded.content,
                   updated_at = excluded.updated_at",
                rusqlite::params![
                    write.context_id,
                    write.source_path,
                    write.content,
                    write.timestamp
                ],
            )?;

            tx.execute(
                "INSERT INTO context_snapshots (context_id, session_id, source, content_hash, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    write.context_id,
                    write.session_id,
                    write.source_path,
                    write.content_hash,
                    write.content,
                    write.timestamp,
                ],
            )?;
            let snapshot_id = tx.last_insert_rowid();

            Ok(ContextSyncOutcome {
                created: !exists,
                snapshot_id,
            })
        })
    }

    /// Get the live context row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_context(&self, id: &str) -> Result<Option<ContextRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, source_path, content, updated_at FROM contexts WHERE id = ?1",
                [id],
                |row| {
                    Ok(ContextRecord {
                        id: row.get(0)?,
                        source_path: row.get(1)?,
                        content: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// List snapshots of a context, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_snapshots(&self, context_id: &str, limit: u32) -> Result<Vec<ContextSnapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, context_id, COALESCE(session_id, ''), source, content_hash, content, created_at
             FROM context_snapshots
             WHERE context_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(rusqlite::params![context_id, limit], |row| {
            Ok(ContextSnapshot {
                id: row.get(0)?,
                context_id: row.get(1)?,
                session_id: row.get(2)?,
                source: row.get(3)?,
                content_hash: row.get(4)?,
                content: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Count snapshots of a context.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_snapshots(&self, context_id: &str) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM context_snapshots WHERE context_id = ?1",
            [context_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_sprint(row: &rusqlite::Row) -> rusqlite::Result<Sprint> {
    Ok(Sprint {
        id: row.get(0)?,
        title: row.get(1)?,
        focus: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: row.get(3)?,
        start_date: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        end_date: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        total_missions: row.get(6)?,
        completed_missions: row.get(7)?,
    })
}
