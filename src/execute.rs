use std::env;
use std::path::PathBuf;
use anyhow::{bail, Result};
use colored::Colorize;
use speckit::backup::backup_directory;
use speckit::copier::copy_directory;
use speckit::gitignore::{ensure_entries, GITIGNORE_ENTRIES};
use speckit::manifest::{ManifestStore, CURSOR_DIR, SPECIFY_DIR};
use speckit::sync::{apply_diff, compute_diff, ChangeSet};
use speckit::templates::template_root;
use speckit::util::{make_scripts_executable, strip_manifest_prefix, walk_files};
use crate::cli::{SpeckitCommand, CLI};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How many paths per category a dry-run preview prints before folding
/// the rest into a count.
const PREVIEW_LIMIT: usize = 5;

pub fn execute(cli: CLI) -> Result<()> {
    match cli.command {
        SpeckitCommand::Init { path } => execute_init(path),
        SpeckitCommand::Update {
            path,
            dry_run,
            skip_backup,
        } => execute_update(path, dry_run, skip_backup),
        SpeckitCommand::Version => execute_version(),
    }
}

fn resolve_project_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Ok(env::current_dir()?),
    }
}

pub fn execute_init(path: Option<PathBuf>) -> Result<()> {
    let project_root = resolve_project_root(path)?;
    let templates = template_root()?;

    let specify_src = templates.join(SPECIFY_DIR);
    if !specify_src.is_dir() {
        bail!("{SPECIFY_DIR} template not found in {}", templates.display());
    }
    let cursor_src = templates.join(CURSOR_DIR);
    if !cursor_src.is_dir() {
        bail!("{CURSOR_DIR} template not found in {}", templates.display());
    }

    println!(
        "{} speckit {} in {}",
        "Initializing".cyan().bold(),
        VERSION,
        project_root.display()
    );

    let specify_files = copy_directory(&specify_src, &project_root.join(SPECIFY_DIR), false)?;
    println!(
        "  {} installed {} files to {SPECIFY_DIR}/",
        "+".green(),
        specify_files.len()
    );
    let cursor_files = copy_directory(&cursor_src, &project_root.join(CURSOR_DIR), false)?;
    println!(
        "  {} installed {} files to {CURSOR_DIR}/",
        "+".green(),
        cursor_files.len()
    );

    make_scripts_executable(&project_root)?;

    let store = ManifestStore::default();
    store.save(&project_root, VERSION, &specify_files, &cursor_files)?;
    ensure_entries(&project_root, &GITIGNORE_ENTRIES)?;

    println!(
        "{} speckit {} initialized",
        "✓".green().bold(),
        VERSION
    );
    println!("Next: edit {SPECIFY_DIR}/memory/constitution.md, then run the speckit commands from Cursor");
    Ok(())
}

pub fn execute_update(path: Option<PathBuf>, dry_run: bool, skip_backup: bool) -> Result<()> {
    let project_root = resolve_project_root(path)?;
    let store = ManifestStore::default();
    if !store.is_installed(&project_root) {
        bail!(
            "speckit is not installed in {}. Run `speckit init` first.",
            project_root.display()
        );
    }
    let templates = template_root()?;

    let current_version = store.installed_version(&project_root);
    println!(
        "{} {} -> {}",
        "Updating".cyan().bold(),
        current_version.as_deref().unwrap_or("unknown"),
        VERSION
    );
    if current_version.as_deref() == Some(VERSION) && !dry_run {
        println!("Already on the latest version; files will be refreshed for consistency");
    }

    let previous_files = store.installed_files(&project_root);
    let previous_specify = strip_manifest_prefix(&previous_files, SPECIFY_DIR);
    let previous_cursor = strip_manifest_prefix(&previous_files, CURSOR_DIR);

    let specify_src = templates.join(SPECIFY_DIR);
    let cursor_src = templates.join(CURSOR_DIR);
    let specify_dst = project_root.join(SPECIFY_DIR);
    let cursor_dst = project_root.join(CURSOR_DIR);

    let specify_diff = if specify_src.is_dir() {
        compute_diff(&specify_src, &specify_dst, &previous_specify)?
    } else {
        ChangeSet::default()
    };
    let cursor_diff = if cursor_src.is_dir() {
        compute_diff(&cursor_src, &cursor_dst, &previous_cursor)?
    } else {
        ChangeSet::default()
    };

    if dry_run {
        print_preview(&specify_diff, &cursor_diff);
        return Ok(());
    }

    if !skip_backup {
        let specify_backup = backup_directory(&specify_dst)?;
        let cursor_backup = backup_directory(&cursor_dst)?;
        println!("  {} backed up to {}", "✓".green(), specify_backup.display());
        println!("  {} backed up to {}", "✓".green(), cursor_backup.display());
    }

    apply_diff(&specify_src, &specify_dst, &specify_diff)?;
    apply_diff(&cursor_src, &cursor_dst, &cursor_diff)?;

    make_scripts_executable(&project_root)?;

    // The new manifest is exactly what the tool manages from now on:
    // the current template trees, not a rescan of the managed dirs
    // (which would swallow user files and mark them for deletion).
    let specify_files = if specify_src.is_dir() {
        walk_files(&specify_src)?
    } else {
        Vec::new()
    };
    let cursor_files = if cursor_src.is_dir() {
        walk_files(&cursor_src)?
    } else {
        Vec::new()
    };
    store.save(&project_root, VERSION, &specify_files, &cursor_files)?;
    ensure_entries(&project_root, &GITIGNORE_ENTRIES)?;

    print_summary(current_version.as_deref(), &specify_diff, &cursor_diff);
    Ok(())
}

pub fn execute_version() -> Result<()> {
    println!("{} version {}", "speckit".cyan().bold(), VERSION);
    Ok(())
}

fn print_category(label: &str, sigil: &str, specify: &[PathBuf], cursor: &[PathBuf]) {
    let total = specify.len() + cursor.len();
    if total == 0 {
        return;
    }
    println!("\n{sigil} {label} ({total}):");
    let mut shown = 0;
    for (top_dir, files) in [(SPECIFY_DIR, specify), (CURSOR_DIR, cursor)] {
        for file in files {
            if shown == PREVIEW_LIMIT {
                println!("  ... and {} more", total - PREVIEW_LIMIT);
                return;
            }
            println!("  {sigil} {top_dir}/{}", file.display());
            shown += 1;
        }
    }
}

fn print_preview(specify: &ChangeSet, cursor: &ChangeSet) {
    if specify.is_empty() && cursor.is_empty() {
        println!(
            "{} no changes detected, everything is up to date",
            "✓".green()
        );
        return;
    }
    println!("\n{}", "Changes preview:".bold());
    print_category("added", "+", &specify.added, &cursor.added);
    print_category("updated", "~", &specify.updated, &cursor.updated);
    print_category("removed", "-", &specify.removed, &cursor.removed);
    println!("\nUser files not in the template are preserved.");
    println!("{}", "--dry-run enabled, nothing was written".yellow());
}

fn print_summary(previous_version: Option<&str>, specify: &ChangeSet, cursor: &ChangeSet) {
    let added = specify.added.len() + cursor.added.len();
    let updated = specify.updated.len() + cursor.updated.len();
    let removed = specify.removed.len() + cursor.removed.len();

    println!(
        "\n{} speckit updated: {} -> {}",
        "✓".green().bold(),
        previous_version.unwrap_or("unknown"),
        VERSION
    );
    if added > 0 {
        println!("  added {added} files");
    }
    if updated > 0 {
        println!("  updated {updated} files");
    }
    if removed > 0 {
        println!("  removed {removed} files");
    }
    if added + updated + removed == 0 {
        println!("  nothing to change");
    }
    println!("Template files synced, user files preserved");
}
