use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use anyhow::Result;
use walkdir::WalkDir;
use crate::manifest::SPECIFY_DIR;

/// Enumerates every file under `root`, returning paths relative to `root`.
/// Directories themselves are not listed. The result is sorted so callers
/// get deterministic output.
pub fn walk_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry.path().strip_prefix(root)?;
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Builds the `/`-separated manifest form of a file path: the top-level
/// directory name followed by the path relative to it. Used for manifest
/// entries on every platform, including Windows.
pub fn manifest_key(top_dir: &str, relative: &Path) -> String {
    let mut key = String::from(top_dir);
    for component in relative.components() {
        key.push('/');
        key.push_str(&component.as_os_str().to_string_lossy());
    }
    key
}

/// Filters a set of prefixed manifest paths down to the entries under
/// `top_dir`, with the `<top_dir>/` prefix stripped off.
pub fn strip_manifest_prefix(files: &BTreeSet<String>, top_dir: &str) -> BTreeSet<String> {
    let prefix = format!("{top_dir}/");
    files
        .iter()
        .filter_map(|file| file.strip_prefix(&prefix))
        .map(str::to_string)
        .collect()
}

/// Marks every `*.sh` under `.specify/scripts/bash/` as executable.
/// Does nothing when the directory is absent or the platform has no
/// unix permission bits.
pub fn make_scripts_executable<P: AsRef<Path>>(project_root: P) -> Result<()> {
    let scripts_dir = project_root
        .as_ref()
        .join(SPECIFY_DIR)
        .join("scripts")
        .join("bash");
    if !scripts_dir.exists() {
        return Ok(());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for entry in std::fs::read_dir(&scripts_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("sh") {
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
            }
        }
    }
    Ok(())
}
