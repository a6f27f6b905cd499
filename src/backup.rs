use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use chrono::Local;
use crate::copier::copy_directory;

/// Snapshots `directory` into a sibling `<name>_backup_<YYYYMMDD_HHMMSS>`
/// copy before a destructive sync. The snapshot is never pruned or
/// restored by the tool; it exists for manual recovery.
///
/// A directory that does not exist is returned unchanged, there is
/// nothing to back up. When several backups land within the same second
/// the name gets a numeric suffix instead of overwriting the earlier
/// snapshot. The source directory is never modified.
pub fn backup_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf> {
    let directory = directory.as_ref();
    if !directory.exists() {
        return Ok(directory.to_path_buf());
    }

    let name = directory
        .file_name()
        .ok_or_else(|| anyhow!("Cannot back up {}", directory.display()))?
        .to_string_lossy()
        .to_string();
    let parent = directory.parent().unwrap_or_else(|| Path::new("."));
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let mut backup_path = parent.join(format!("{name}_backup_{timestamp}"));
    let mut attempt = 1;
    while backup_path.exists() {
        backup_path = parent.join(format!("{name}_backup_{timestamp}_{attempt}"));
        attempt += 1;
    }

    copy_directory(directory, &backup_path, false)?;
    Ok(backup_path)
}
