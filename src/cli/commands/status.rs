//! Status command implementation.

use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::{SprintProgress, SqliteStorage};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusOutput {
    sprints: Vec<SprintProgress>,
    context: Option<ContextInfo>,
}

#[derive(Serialize)]
struct ContextInfo {
    id: String,
    source_path: String,
    updated_at: String,
    size: usize,
    snapshot_count: i64,
}

/// Execute the status command.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or queried.
pub fn execute(db_path: Option<&Path>, context_id: &str, json: bool) -> Result<()> {
    let storage = SqliteStorage::open(&resolve_db_path(db_path))?;

    let sprints = storage.sprint_progress()?;
    let context = match storage.get_context(context_id)? {
        Some(record) => Some(ContextInfo {
            snapshot_count: storage.count_snapshots(&record.id)?,
            size: record.content.len(),
            id: record.id,
            source_path: record.source_path,
            updated_at: record.updated_at,
        }),
        None => None,
    };

    if json {
        let output = StatusOutput { sprints, context };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "CMOS Status".bold());
    println!("===========");
    println!();

    if sprints.is_empty() {
        println!("No sprints seeded.");
    }
    for progress in &sprints {
        let sprint = &progress.sprint;
        println!(
            "{} {} [{}]  {} → {}",
            sprint.id.cyan(),
            sprint.title,
            sprint.status,
            sprint.start_date,
            sprint.end_date
        );
        println!(
            "  missions: {}/{} completed",
            sprint.completed_missions, sprint.total_missions
        );
        for (status, count) in &progress.mission_status {
            println!("    {status}: {count}");
        }
    }

    println!();
    match context {
        Some(ctx) => {
            println!("Context {} ({} bytes)", ctx.id.cyan(), ctx.size);
            println!("  source:    {}", ctx.source_path);
            println!("  updated:   {}", ctx.updated_at);
            println!("  snapshots: {}", ctx.snapshot_count);
        }
        None => println!("No context record for {context_id}."),
    }

    Ok(())
}
