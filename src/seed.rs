//! Sprint seeding.

use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::model::SprintPlan;
use crate::storage::{SeedReport, SqliteStorage};

/// Insert `plan` into the store at `db_path`.
///
/// The connection lives only for this call. Seeding is not idempotent:
/// running the same plan twice fails on the duplicate sprint id and the
/// second attempt writes nothing.
///
/// # Errors
///
/// Returns an error if the store is missing or any insert fails.
pub fn seed_sprint(db_path: &Path, plan: &SprintPlan) -> Result<SeedReport> {
    if !plan.mission_count_matches() {
        warn!(
            sprint = %plan.sprint.id,
            declared = plan.sprint.total_missions,
            listed = plan.missions.len(),
            "total_missions does not match the missions in the plan"
        );
    }

    let mut storage = SqliteStorage::open(db_path)?;
    let report = storage.seed_sprint(plan)?;

    info!(
        sprint = %report.sprint_id,
        missions = report.missions_inserted,
        "Seeded sprint"
    );
    Ok(report)
}
