//! Error types for the CMOS seeder.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers
//!
//! Every error terminates the run; there is no retry or partial recovery.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CMOS operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes.
///
/// The process exit status is always the conventional failure code;
/// scripts that need the category match on this string instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,
    IoError,
    JsonError,
    ConfigError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur while seeding or updating the planning store.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database not initialized at {}", path.display())]
    NotInitialized { path: PathBuf },

    #[error("Database already initialized at {}", path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data file {}: {source}", path.display())]
    DataFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized { .. } => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::DataFile { .. } => ErrorCode::JsonError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Context-aware recovery hint for the operator.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized { path } => Some(format!(
                "Run `cmos init --db {}` to create the database",
                path.display()
            )),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to re-apply the schema.",
                path.display()
            )),

            Self::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Some(
                    "A row with this identifier already exists. Seeding is not idempotent; \
                     nothing from this run was written."
                        .to_string(),
                )
            }

            Self::Database(e) if e.to_string().contains("no such table") => {
                Some("The schema is missing. Run `cmos init --force` on this database.".to_string())
            }

            Self::DataFile { .. } => Some(
                "Data files must match the built-in plan/document layout (see data/)".to_string(),
            ),

            Self::Database(_) | Self::Io(_) | Self::Json(_) | Self::Config(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = Error::Config("bad".into());
        assert_eq!(err.error_code().as_str(), "CONFIG_ERROR");

        let err = Error::NotInitialized {
            path: PathBuf::from("cmos/db/cmos.sqlite"),
        };
        assert_eq!(err.error_code(), ErrorCode::NotInitialized);
        assert!(err.hint().unwrap().contains("cmos init"));
    }

    #[test]
    fn test_messages_mention_error() {
        let errors = [
            Error::Database(rusqlite::Error::QueryReturnedNoRows),
            Error::Io(std::io::Error::other("disk full")),
            Error::Config("missing".into()),
        ];
        for err in errors {
            assert!(err.to_string().to_lowercase().contains("error"));
        }
    }

    #[test]
    fn test_structured_json() {
        let err = Error::AlreadyInitialized {
            path: PathBuf::from("/tmp/cmos.sqlite"),
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "ALREADY_INITIALIZED");
        assert!(json["error"]["hint"].as_str().unwrap().contains("--force"));
    }
}
