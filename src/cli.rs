use std::path::PathBuf;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    #[command(subcommand)]
    pub(crate) command: SpeckitCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum SpeckitCommand {
    /// Installs the `.specify/` and `.cursor/` scaffolding into a project
    Init {
        /// Project directory to initialize. Defaults to the current directory
        path: Option<PathBuf>,
    },
    /// Updates installed scaffolding from the bundled templates, preserving user files
    Update {
        /// Project directory to update. Defaults to the current directory
        path: Option<PathBuf>,
        /// Show what would change without writing anything
        #[clap(long)]
        dry_run: bool,
        /// Do not snapshot `.specify/` and `.cursor/` before syncing (not recommended)
        #[clap(long)]
        skip_backup: bool,
    },
    /// Shows the speckit version
    Version,
}
