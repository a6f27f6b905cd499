//! Template synchronization: reconciles the template tree, the previous
//! install manifest and the destination directory into add/update/remove
//! operations.
//!
//! Computation and application are split on purpose: [`compute_diff`] is
//! read-only so `--dry-run` and a live update share one diff, and the
//! preview can never drift from what an update would actually do.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use crate::util::walk_files;

/// The outcome of one synchronization pass, as paths relative to the
/// destination root. The three lists are disjoint; files already
/// byte-identical to the template appear in none of them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Template files that were missing at the destination.
    pub added: Vec<PathBuf>,
    /// Destination files whose bytes differ from the template.
    pub updated: Vec<PathBuf>,
    /// Previously installed files no longer present in the template.
    pub removed: Vec<PathBuf>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// Computes what [`apply_diff`] would change, without touching the
/// destination.
///
/// * Template files missing at `dst` land in `added`.
/// * Template files present at `dst` are compared byte-for-byte; only
///   real content differences land in `updated`, so an unchanged tree
///   produces no churn.
/// * Entries of `previous_files` (paths relative to `dst`, recorded by
///   the last install) that left the template land in `removed`, but
///   only if they still exist at the destination.
///
/// Anything at `dst` that is in neither the template nor
/// `previous_files` is user-owned and is never even enumerated.
///
/// # Errors
///
/// Fails if a template path exists at the destination as a directory;
/// there is no sane merge for that, so it is surfaced instead of
/// guessed at. Read failures propagate.
pub fn compute_diff<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    previous_files: &BTreeSet<String>,
) -> Result<ChangeSet> {
    let src = src.as_ref();
    let dst = dst.as_ref();
    let mut diff = ChangeSet::default();

    let template_files = walk_files(src)?;
    let template_set: BTreeSet<String> = template_files
        .iter()
        .map(|path| path.to_string_lossy().replace('\\', "/"))
        .collect();

    for relative in &template_files {
        let target = dst.join(relative);
        if target.is_dir() {
            bail!(
                "{} is a file in the template but a directory in the project",
                relative.display()
            );
        }
        if target.exists() {
            let template_bytes = fs::read(src.join(relative))
                .with_context(|| format!("Could not read template file {}", relative.display()))?;
            let destination_bytes = fs::read(&target)
                .with_context(|| format!("Could not read {}", target.display()))?;
            if template_bytes != destination_bytes {
                diff.updated.push(relative.clone());
            }
        } else {
            diff.added.push(relative.clone());
        }
    }

    for previous in previous_files {
        if template_set.contains(previous) {
            continue;
        }
        // Dropped from the template since the last install. Only delete
        // what is still there.
        if dst.join(previous).is_file() {
            diff.removed.push(PathBuf::from(previous));
        }
    }

    Ok(diff)
}

/// Applies a previously computed [`ChangeSet`] to the destination:
/// writes added and updated files from the template and deletes removed
/// ones. After a deletion the parent directory is pruned best-effort; a
/// directory that still holds user files simply stays.
///
/// # Errors
///
/// Per-file I/O failures propagate and abort the rest of the
/// application; changes applied before the failure remain on disk.
pub fn apply_diff<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q, diff: &ChangeSet) -> Result<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    for relative in diff.added.iter().chain(diff.updated.iter()) {
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create directory {}", parent.display()))?;
        }
        fs::copy(src.join(relative), &target)
            .with_context(|| format!("Could not write {}", target.display()))?;
    }

    for relative in &diff.removed {
        let target = dst.join(relative);
        fs::remove_file(&target)
            .with_context(|| format!("Could not remove {}", target.display()))?;
        if let Some(parent) = target.parent() {
            // Fails on non-empty directories, which is fine.
            let _ = fs::remove_dir(parent);
        }
    }

    Ok(())
}

/// Computes and applies the diff in one go. Idempotent: a second run
/// against an unchanged template returns an empty [`ChangeSet`].
pub fn sync_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    previous_files: &BTreeSet<String>,
) -> Result<ChangeSet> {
    let diff = compute_diff(src.as_ref(), dst.as_ref(), previous_files)?;
    apply_diff(src.as_ref(), dst.as_ref(), &diff)?;
    Ok(diff)
}
