use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::util::walk_files;

/// Copies every file in `src` into `dst` recursively, creating missing
/// intermediate directories. Used for first-time installation; updates go
/// through [`crate::sync`] instead.
///
/// # Arguments
///
/// * `src` - Template directory to copy from.
/// * `dst` - Destination root, created on demand.
/// * `skip_existing` - If true, files already present at the destination
///   are left untouched and excluded from the result.
///
/// # Returns
///
/// The copied file paths, relative to `dst`. A template with no files
/// yields an empty list.
///
/// # Errors
///
/// Returns an error if a destination path cannot be created or written.
/// Files copied before the failure stay on disk; there is no rollback at
/// this layer.
pub fn copy_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    skip_existing: bool,
) -> Result<Vec<PathBuf>> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    let mut copied = Vec::new();

    for relative in walk_files(src)? {
        let target = dst.join(&relative);
        if skip_existing && target.exists() {
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create directory {}", parent.display()))?;
        }
        // fs::copy carries the permission bits over, so shipped scripts
        // stay executable.
        fs::copy(src.join(&relative), &target)
            .with_context(|| format!("Could not write {}", target.display()))?;
        copied.push(relative);
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_copy_directory_copies_nested_files() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(src.path(), "a.txt", "1");
        write(src.path(), "scripts/bash/check.sh", "#!/bin/sh\n");

        let copied = copy_directory(src.path(), dst.path(), false).unwrap();

        assert_eq!(copied.len(), 2);
        assert_eq!(fs::read_to_string(dst.path().join("a.txt")).unwrap(), "1");
        assert!(dst.path().join("scripts/bash/check.sh").exists());
    }

    #[test]
    fn test_copy_directory_empty_source() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        let copied = copy_directory(src.path(), dst.path(), false).unwrap();
        assert!(copied.is_empty());
    }

    #[test]
    fn test_copy_directory_skip_existing_preserves_content() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(src.path(), "a.txt", "template");
        write(src.path(), "b.txt", "new");
        write(dst.path(), "a.txt", "user edit");

        let copied = copy_directory(src.path(), dst.path(), true).unwrap();

        assert_eq!(copied, vec![PathBuf::from("b.txt")]);
        assert_eq!(
            fs::read_to_string(dst.path().join("a.txt")).unwrap(),
            "user edit"
        );
    }

    #[test]
    fn test_copy_directory_overwrites_without_skip() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(src.path(), "a.txt", "template");
        write(dst.path(), "a.txt", "user edit");

        let copied = copy_directory(src.path(), dst.path(), false).unwrap();

        assert_eq!(copied, vec![PathBuf::from("a.txt")]);
        assert_eq!(
            fs::read_to_string(dst.path().join("a.txt")).unwrap(),
            "template"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_directory_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        write(src.path(), "run.sh", "#!/bin/sh\n");
        fs::set_permissions(
            src.path().join("run.sh"),
            fs::Permissions::from_mode(0o755),
        )
        .unwrap();

        copy_directory(src.path(), dst.path(), false).unwrap();

        let mode = fs::metadata(dst.path().join("run.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
