//! Context file writes.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Replace the file at `path` with `content`.
///
/// Writes a sibling temp file, syncs it, then renames over the target, so
/// readers see either the old document or the new one. The previous
/// content is not kept. Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn overwrite(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let written = write_synced(&temp_path, content).and_then(|()| fs::rename(&temp_path, path));
    if let Err(err) = written {
        // Best effort cleanup; report the original error
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    Ok(())
}

fn write_synced(path: &Path, content: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overwrite_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cmos").join("context").join("MASTER_CONTEXT.json");

        overwrite(&path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("MASTER_CONTEXT.json");
        fs::write(&path, "{\"old\": true, \"padding\": \"xxxxxxxxxxxxxxxx\"}").unwrap();

        overwrite(&path, "{\"new\": true}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"new\": true}");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp = TempDir::new().unwrap();
        // A non-empty directory at the target makes the rename fail
        let path = temp.path().join("MASTER_CONTEXT.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(overwrite(&path, "{}").is_err());

        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
