//! Sprint and mission models.
//!
//! A sprint is a time-boxed batch of planned work; each mission belongs to
//! exactly one sprint. Identifiers are supplied by the plan author and must
//! be unique across the store.

use serde::{Deserialize, Serialize};

/// The built-in Sprint 09 plan, embedded at compile time.
const BUILTIN_PLAN: &str = include_str!("../../data/sprint-09.json");

/// A sprint row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sprint {
    /// Unique identifier (e.g., "sprint-09")
    pub id: String,

    pub title: String,

    /// One-line description of what the sprint is for
    pub focus: String,

    /// Free-form status label ("planning", "active", ...)
    pub status: String,

    /// ISO date (YYYY-MM-DD)
    pub start_date: String,

    /// ISO date (YYYY-MM-DD)
    pub end_date: String,

    pub total_missions: i64,

    pub completed_missions: i64,
}

/// A mission as declared in a sprint plan.
///
/// The owning sprint is implied by the plan it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub status: String,
    pub notes: String,
}

/// A mission row as stored, including its owning sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionRecord {
    pub id: String,
    pub sprint_id: String,
    pub name: String,
    pub status: String,
    pub notes: String,
}

/// A sprint together with the missions to seed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprintPlan {
    pub sprint: Sprint,
    pub missions: Vec<Mission>,
}

impl SprintPlan {
    /// Parse a plan from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not match the plan layout.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The built-in Sprint 09 plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is malformed.
    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_PLAN)
    }

    /// Whether the declared `total_missions` matches the missions listed.
    #[must_use]
    pub fn mission_count_matches(&self) -> bool {
        usize::try_from(self.sprint.total_missions).is_ok_and(|n| n == self.missions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plan() {
        let plan = SprintPlan::builtin().unwrap();
        assert_eq!(plan.sprint.id, "sprint-09");
        assert_eq!(plan.sprint.title, "CMOS Integration & Self-Containment");
        assert_eq!(plan.sprint.status, "planning");
        assert_eq!(plan.missions.len(), 8);
        assert!(plan.mission_count_matches());
        assert!(plan.missions.iter().all(|m| m.status == "queued"));
        assert_eq!(plan.missions[0].id, "s09-m01");
        assert_eq!(plan.missions[7].id, "s09-m08");
    }

    #[test]
    fn test_mission_count_mismatch() {
        let mut plan = SprintPlan::builtin().unwrap();
        plan.missions.pop();
        assert!(!plan.mission_count_matches());

        plan.sprint.total_missions = -1;
        assert!(!plan.mission_count_matches());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let text = r#"{"sprint": {"id": "s", "title": "t", "focus": "f", "status": "x",
            "start_date": "a", "end_date": "b", "total_missions": 0,
            "completed_missions": 0, "owner": "me"}, "missions": []}"#;
        assert!(SprintPlan::from_json(text).is_err());
    }
}
