//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::model::LabelMode;

pub mod commands;

/// CMOS planning store seeder
#[derive(Parser, Debug)]
#[command(name = "cmos", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: cmos/db/cmos.sqlite)
    #[arg(long, global = true, env = "CMOS_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and apply the schema
    Init {
        /// Re-apply the schema to an existing database
        #[arg(long)]
        force: bool,
    },

    /// Insert a sprint and its missions (fails if the sprint already exists)
    SeedSprint {
        /// Sprint plan JSON (default: built-in Sprint 09)
        #[arg(long)]
        plan: Option<PathBuf>,
    },

    /// Overwrite the master context file and snapshot it into the database
    UpdateContext(UpdateContextArgs),

    /// List context snapshots, newest first
    Snapshots {
        /// Context identifier
        #[arg(long, default_value = crate::context::DEFAULT_CONTEXT_ID)]
        context_id: String,

        /// Maximum snapshots to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show sprints, mission progress and context state
    Status {
        /// Context identifier
        #[arg(long, default_value = crate::context::DEFAULT_CONTEXT_ID)]
        context_id: String,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
pub struct UpdateContextArgs {
    /// Context document JSON (default: built-in master context)
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Context file to overwrite (default: cmos/context/MASTER_CONTEXT.json)
    #[arg(long, env = "CMOS_CONTEXT_PATH")]
    pub output: Option<PathBuf>,

    /// Context identifier
    #[arg(long, default_value = crate::context::DEFAULT_CONTEXT_ID)]
    pub context_id: String,

    /// Session label recorded on the snapshot
    #[arg(long, default_value = crate::context::DEFAULT_SESSION_ID)]
    pub session: String,

    /// How the snapshot's content hash is produced
    #[arg(long, value_enum, default_value_t)]
    pub label_mode: LabelMode,
}

/// Print a success line.
pub(crate) fn ok(message: &str) {
    if crate::is_quiet() {
        return;
    }
    println!("✅ {}", message.green());
}

/// Print an indented detail line under a success line.
pub(crate) fn detail(message: &str) {
    if crate::is_quiet() {
        return;
    }
    println!("   - {message}");
}
