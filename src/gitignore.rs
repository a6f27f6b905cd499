use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

/// Comment line written above the entries speckit appends.
pub const GITIGNORE_MARKER: &str = "# speckit - generated files";

/// Subpaths holding generated or ephemeral state that should never be
/// committed.
pub const GITIGNORE_ENTRIES: [&str; 2] = [".specify/.deltas/", ".cursor/.agent-tools/"];

/// Makes sure `.gitignore` covers every entry in `required_entries`.
///
/// A missing file is created with the marker comment plus the entries.
/// An existing file keeps its content and line order; only entries with
/// no substring-matching line are appended, under a single marker
/// comment. Once everything is present, further calls change nothing.
pub fn ensure_entries<P: AsRef<Path>>(project_root: P, required_entries: &[&str]) -> Result<()> {
    let path = project_root.as_ref().join(".gitignore");

    if !path.exists() {
        let mut content = String::from(GITIGNORE_MARKER);
        for entry in required_entries {
            content.push('\n');
            content.push_str(entry);
        }
        content.push('\n');
        return fs::write(&path, content)
            .with_context(|| format!("Could not write {}", path.display()));
    }

    let content =
        fs::read_to_string(&path).with_context(|| format!("Could not read {}", path.display()))?;
    let missing: Vec<&str> = required_entries
        .iter()
        .filter(|entry| !content.lines().any(|line| line.contains(**entry)))
        .copied()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    lines.push(String::new());
    if !content.lines().any(|line| line.contains(GITIGNORE_MARKER)) {
        lines.push(GITIGNORE_MARKER.to_string());
    }
    for entry in missing {
        lines.push(entry.to_string());
    }
    fs::write(&path, lines.join("\n") + "\n")
        .with_context(|| format!("Could not write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_file_with_marker_and_entries() {
        let dir = tempdir().unwrap();
        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();

        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        let expected = format!(
            "{GITIGNORE_MARKER}\n{}\n{}\n",
            GITIGNORE_ENTRIES[0], GITIGNORE_ENTRIES[1]
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn test_repeated_calls_converge() {
        let dir = tempdir().unwrap();
        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();
        let first = fs::read_to_string(dir.path().join(".gitignore")).unwrap();

        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();
        let second = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_appends_only_missing_entries() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".gitignore"),
            "target/\n.specify/.deltas/\n",
        )
        .unwrap();

        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();

        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(content.starts_with("target/\n.specify/.deltas/\n"));
        assert!(content.contains(GITIGNORE_MARKER));
        assert!(content.contains(".cursor/.agent-tools/"));
        assert_eq!(content.matches(".specify/.deltas/").count(), 1);
    }

    #[test]
    fn test_marker_is_not_duplicated() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".gitignore"),
            format!("{GITIGNORE_MARKER}\n.specify/.deltas/\n"),
        )
        .unwrap();

        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();

        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(content.matches(GITIGNORE_MARKER).count(), 1);
        assert!(content.contains(".cursor/.agent-tools/"));
    }

    #[test]
    fn test_existing_content_keeps_its_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n*.log\n").unwrap();

        ensure_entries(dir.path(), &GITIGNORE_ENTRIES).unwrap();

        let content = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        let target_pos = content.find("target/").unwrap();
        let log_pos = content.find("*.log").unwrap();
        let marker_pos = content.find(GITIGNORE_MARKER).unwrap();
        assert!(target_pos < log_pos && log_pos < marker_pos);
    }
}
