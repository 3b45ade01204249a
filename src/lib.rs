//! CMOS planning store seeder.
//!
//! Seeds sprints and missions into the CMOS SQLite store and keeps the
//! master context file and its snapshot history in sync.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Sprint, Mission, ContextDocument, snapshots)
//! - [`storage`] - SQLite database layer
//! - [`seed`] - Sprint seeding procedure
//! - [`context`] - Context file write and snapshot procedure
//! - [`config`] - Path resolution and data file loading
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod seed;
pub mod storage;

pub use error::{Error, Result};

/// Global quiet flag for `--quiet`.
///
/// When set, success lines are suppressed; errors are still printed.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
