//! The version marker and install manifest.
//!
//! The manifest is the sole arbiter of which destination files are
//! tool-managed: every path it lists was written by speckit during the
//! last successful install or update, and anything it does not list is
//! user-owned and off-limits to the synchronizer.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::util::manifest_key;

/// Top-level directory holding scripts, memory and specs.
pub const SPECIFY_DIR: &str = ".specify";
/// Top-level directory holding the Cursor editor integration.
pub const CURSOR_DIR: &str = ".cursor";

/// On-disk manifest record: `.specify/.manifest.json`.
///
/// Both fields default so a partial record degrades instead of failing
/// the whole parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub files: Vec<String>,
}

/// Reads and writes the version marker and manifest for one project.
///
/// The file locations live on the instance rather than in process-wide
/// constants, so tests can point several isolated stores at their own
/// layouts.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    version_file: PathBuf,
    manifest_file: PathBuf,
    specify_dir: String,
    cursor_dir: String,
}

impl Default for ManifestStore {
    fn default() -> Self {
        Self {
            version_file: PathBuf::from(SPECIFY_DIR).join("VERSION"),
            manifest_file: PathBuf::from(SPECIFY_DIR).join(".manifest.json"),
            specify_dir: SPECIFY_DIR.to_string(),
            cursor_dir: CURSOR_DIR.to_string(),
        }
    }
}

impl ManifestStore {
    /// Returns the installed version, if any.
    ///
    /// Two encodings are accepted: the legacy bare version string, and a
    /// JSON object with a `version` field. JSON that does not parse is
    /// taken verbatim as the version rather than treated as corruption.
    pub fn installed_version<P: AsRef<Path>>(&self, project_root: P) -> Option<String> {
        let path = project_root.as_ref().join(&self.version_file);
        let content = fs::read_to_string(path).ok()?;
        let content = content.trim();
        if content.starts_with('{') {
            return match serde_json::from_str::<serde_json::Value>(content) {
                Ok(value) => value
                    .get("version")
                    .and_then(|version| version.as_str())
                    .map(str::to_string),
                Err(_) => Some(content.to_string()),
            };
        }
        if content.is_empty() {
            None
        } else {
            Some(content.to_string())
        }
    }

    /// Returns the file paths recorded by the previous install, each
    /// prefixed with its top-level directory.
    ///
    /// A missing or corrupt manifest yields the empty set: the next
    /// update then behaves like a fresh install and removes nothing.
    pub fn installed_files<P: AsRef<Path>>(&self, project_root: P) -> BTreeSet<String> {
        let path = project_root.as_ref().join(&self.manifest_file);
        let Ok(content) = fs::read_to_string(path) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Manifest>(&content) {
            Ok(manifest) => manifest.files.into_iter().collect(),
            Err(_) => BTreeSet::new(),
        }
    }

    /// Persists the version marker and rewrites the manifest.
    ///
    /// `specify_files` and `cursor_files` are relative to their
    /// top-level directories; the stored paths carry the directory
    /// prefix and are sorted so repeated saves produce identical bytes.
    pub fn save<P: AsRef<Path>>(
        &self,
        project_root: P,
        version: &str,
        specify_files: &[PathBuf],
        cursor_files: &[PathBuf],
    ) -> Result<()> {
        let root = project_root.as_ref();

        let version_path = root.join(&self.version_file);
        if let Some(parent) = version_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create directory {}", parent.display()))?;
        }
        fs::write(&version_path, format!("{version}\n"))
            .with_context(|| format!("Could not write {}", version_path.display()))?;

        let mut files: Vec<String> = specify_files
            .iter()
            .map(|file| manifest_key(&self.specify_dir, file))
            .chain(
                cursor_files
                    .iter()
                    .map(|file| manifest_key(&self.cursor_dir, file)),
            )
            .collect();
        files.sort();

        let manifest = Manifest {
            version: version.to_string(),
            files,
        };
        let manifest_path = root.join(&self.manifest_file);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("Could not write {}", manifest_path.display()))?;
        Ok(())
    }

    /// True when both managed directories exist, whatever the manifest
    /// or version marker say.
    pub fn is_installed<P: AsRef<Path>>(&self, project_root: P) -> bool {
        let root = project_root.as_ref();
        root.join(&self.specify_dir).exists() && root.join(&self.cursor_dir).exists()
    }
}
