//! Master context document and its store records.
//!
//! The context document is the nested planning summary an agent loads at
//! the start of a session. It lives in two places: a pretty-printed JSON
//! file in the project, and the `contexts` / `context_snapshots` tables.
//!
//! Map-valued sections use `IndexMap`, so keys serialize in the order the
//! document declares them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The built-in master context, embedded at compile time.
const BUILTIN_DOCUMENT: &str = include_str!("../../data/master_context.json");

/// Full master context document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextDocument {
    pub project: Project,
    pub working_memory: WorkingMemory,
    pub technical_context: TechnicalContext,
    pub sprint_tracking: SprintTracking,
    pub context_health: ContextHealth,
    pub ai_instructions: AiInstructions,
    pub next_session_context: NextSessionContext,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
    pub version: String,
    pub description: String,
    pub status: String,
    pub start_date: String,
    pub deployment: Deployment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Deployment {
    pub platform: String,
    pub integration_target: String,
    pub environment: String,
}

/// Session bookkeeping and per-domain working notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkingMemory {
    pub active_domain: String,
    pub session_count: u32,
    pub last_session: String,
    pub agents_md_path: String,
    pub agents_md_loaded: bool,
    pub active_mission: String,
    pub domains: IndexMap<String, Domain>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Domain {
    pub status: String,
    pub priority: u32,
    pub current_mission: String,
    pub missions: IndexMap<String, SprintSummary>,
    pub critical_facts: Vec<String>,
    pub constraints: Vec<String>,
    pub decisions_made: Vec<String>,
    pub files_created: Vec<String>,
    pub key_insights: Vec<String>,
}

/// Sprint summary as referenced from a domain's mission list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprintSummary {
    pub id: String,
    pub title: String,
    pub status: String,
    pub total_missions: u32,
    pub focus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TechnicalContext {
    pub dependencies: Vec<String>,
    /// Tool name -> command line
    pub tooling: IndexMap<String, String>,
    pub reference_docs: Vec<String>,
    pub integration_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SprintTracking {
    pub current_sprint: String,
    pub sprint_start: String,
    pub sprint_end: String,
    pub sprint_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextHealth {
    pub anti_pattern_detection: bool,
    pub compression_enabled: bool,
    pub last_reset: String,
    pub sessions_since_reset: u32,
    pub size_kb: u64,
    pub size_limit_kb: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiInstructions {
    pub preferred_language: String,
    pub code_style: String,
    pub testing_required: bool,
    pub documentation_level: String,
    pub special_instructions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NextSessionContext {
    pub blockers: Vec<String>,
    pub important_reminders: Vec<String>,
    pub key_reference_documents: Vec<String>,
    pub when_we_resume: Vec<String>,
}

/// Migration bookkeeping for the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub migrated_at: String,
    pub source_version: String,
    pub last_updated: String,
    pub session_summary: String,
}

impl ContextDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not match the document layout.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The built-in master context.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded data is malformed.
    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_DOCUMENT)
    }

    /// Serialize as indented, human-readable JSON.
    ///
    /// Two-space indentation, non-ASCII written verbatim, no trailing newline.
    /// This exact text is what lands in the file and in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The live `contexts` row: at most one per identifier.
#[derive(Debug, Clone, Serialize)]
pub struct ContextRecord {
    pub id: String,
    pub source_path: String,
    pub content: String,
    pub updated_at: String,
}

/// An append-only `context_snapshots` row.
#[derive(Debug, Clone, Serialize)]
pub struct ContextSnapshot {
    /// Auto-generated row id
    pub id: i64,
    pub context_id: String,
    pub session_id: String,
    pub source: String,
    pub content_hash: String,
    pub content: String,
    pub created_at: String,
}

/// How a snapshot's `content_hash` column is filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LabelMode {
    /// `snapshot_YYYYMMDD_HHMMSS` (UTC); a traceability label, not a digest
    #[default]
    Timestamp,
    /// `sha256:<hex>` of the serialized content
    Sha256,
}

impl LabelMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Sha256 => "sha256",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_document_values() {
        let doc = ContextDocument::builtin().unwrap();
        assert_eq!(doc.project.name, "CMOS Starter Template");
        assert_eq!(doc.sprint_tracking.current_sprint, "sprint-09");
        assert_eq!(doc.sprint_tracking.sprint_status, "planning");
        assert!(doc.working_memory.agents_md_loaded);
        assert!(!doc.context_health.compression_enabled);
        assert_eq!(doc.context_health.size_limit_kb, 100);
        assert!(doc.next_session_context.blockers.is_empty());

        let domain = &doc.working_memory.domains["cmos_integration"];
        assert_eq!(domain.priority, 1);
        assert_eq!(domain.missions["sprint-09"].total_missions, 8);
    }

    #[test]
    fn test_pretty_json_layout() {
        let doc = ContextDocument::builtin().unwrap();
        let text = doc.to_pretty_json().unwrap();

        assert!(text.starts_with("{\n  \"project\": {\n    \"name\": \"CMOS Starter Template\""));
        assert!(!text.ends_with('\n'));
        // Non-ASCII stays as-is rather than \u escapes
        assert!(text.contains("self-containment → detection"));
        assert!(text.contains("\"blockers\": []"));

        let back = ContextDocument::from_json(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_serialized_text_matches_data_file() {
        let text = ContextDocument::builtin().unwrap().to_pretty_json().unwrap();
        assert_eq!(text, BUILTIN_DOCUMENT.trim_end());
    }

    #[test]
    fn test_tooling_keeps_declared_order() {
        let text = ContextDocument::builtin().unwrap().to_pretty_json().unwrap();
        let seed = text.find("\"seed_database\"").unwrap();
        let validate = text.find("\"validate_parity\"").unwrap();
        let update = text.find("\"update_context\"").unwrap();
        assert!(seed < validate && validate < update);

        let doc = ContextDocument::builtin().unwrap();
        let keys: Vec<&str> = doc.technical_context.tooling.keys().map(String::as_str).collect();
        assert_eq!(keys, ["seed_database", "validate_parity", "update_context"]);
    }

    #[test]
    fn test_label_mode_default() {
        assert_eq!(LabelMode::default(), LabelMode::Timestamp);
        assert_eq!(LabelMode::Sha256.as_str(), "sha256");
    }
}
