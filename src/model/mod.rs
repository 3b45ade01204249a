//! Data models for the planning store.
//!
//! This module contains all domain models:
//! - Sprint, Mission, SprintPlan
//! - ContextDocument and its sections
//! - ContextRecord, ContextSnapshot

pub mod context;
pub mod sprint;

pub use context::{ContextDocument, ContextRecord, ContextSnapshot, LabelMode};
pub use sprint::{Mission, MissionRecord, Sprint, SprintPlan};
