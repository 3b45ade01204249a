//! Seed-sprint command implementation.

use crate::cli::ok;
use crate::config::{load_plan, resolve_db_path};
use crate::error::Result;
use std::path::Path;

/// Execute the seed-sprint command.
///
/// # Errors
///
/// Returns an error if the plan cannot be loaded or any insert fails.
pub fn execute(db_path: Option<&Path>, plan_path: Option<&Path>, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path);
    let plan = load_plan(plan_path)?;

    let report = crate::seed::seed_sprint(&db_path, &plan)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    ok(&format!(
        "Successfully seeded Sprint {}: {}",
        report.sprint_id, report.title
    ));
    ok(&format!("Inserted {} missions", report.missions_inserted));
    Ok(())
}
