use std::path::PathBuf;
use anyhow::{bail, Context, Result};

/// Environment variable overriding where the bundled templates live.
/// The integration tests rely on it; packagers can too.
pub const TEMPLATES_ENV: &str = "SPECKIT_TEMPLATES";

/// Locates the template tree shipped with the tool.
///
/// `SPECKIT_TEMPLATES` wins when set; otherwise the `templates/`
/// directory next to the executable is used. The returned path is
/// verified to exist, so a broken installation fails before anything in
/// the project is touched.
pub fn template_root() -> Result<PathBuf> {
    let root = match std::env::var(TEMPLATES_ENV) {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_exe()
            .context("Could not locate the speckit executable")?
            .parent()
            .map(|dir| dir.join("templates"))
            .context("Could not locate the speckit executable")?,
    };
    if !root.is_dir() {
        bail!(
            "Template directory not found at {}. The installation may be corrupted.",
            root.display()
        );
    }
    Ok(root)
}
