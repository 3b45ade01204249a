//! Version command implementation.

use crate::config::DEFAULT_DB_PATH;
use crate::error::Result;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;
use serde::Serialize;

/// Tool version plus the store layout this binary writes.
#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    build: &'static str,
    schema_version: i32,
    default_db: &'static str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        schema_version: CURRENT_SCHEMA_VERSION,
        default_db: DEFAULT_DB_PATH,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!(
        "cmos version {} ({}), store schema v{}",
        output.version, output.build, output.schema_version
    );
    println!("  default store: {}", output.default_db);
    Ok(())
}
