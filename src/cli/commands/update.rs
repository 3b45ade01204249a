//! Update-context command implementation.

use crate::cli::{detail, ok, UpdateContextArgs};
use crate::config::{load_document, resolve_context_path, resolve_db_path};
use crate::context::{update_context, UpdateOptions};
use crate::error::Result;
use std::path::Path;

/// Execute the update-context command.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded, the file cannot be
/// written, or the store sync fails.
pub fn execute(db_path: Option<&Path>, args: &UpdateContextArgs, json: bool) -> Result<()> {
    let db_path = resolve_db_path(db_path);
    let document = load_document(args.document.as_deref())?;

    let options = UpdateOptions {
        output: resolve_context_path(args.output.as_deref()),
        context_id: args.context_id.clone(),
        session_id: args.session.clone(),
        label_mode: args.label_mode,
    };

    let report = update_context(&db_path, &document, &options)?;

    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    ok(&format!("Updated context file at {}", report.path.display()));
    if report.created {
        ok(&format!("Created new {} record", report.context_id));
    } else {
        ok(&format!("Updated existing {} record", report.context_id));
    }
    ok(&format!(
        "Created context snapshot #{} ({})",
        report.snapshot_id, report.content_hash
    ));
    detail(&format!("label: {}", report.label_mode));
    detail(&format!("session: {}", options.session_id));
    detail(&format!("updated_at: {}", report.updated_at));
    Ok(())
}
