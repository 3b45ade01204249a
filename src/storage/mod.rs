//! SQLite storage layer for the planning store.
//!
//! This module provides the persistence layer using SQLite with:
//! - One connection per command, released on drop
//! - Transaction discipline for atomic writes
//! - An append-only snapshot table for context history
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{ContextSyncOutcome, ContextWrite, SeedReport, SprintProgress, SqliteStorage};
