//! # Speckit Core Library
//!
//! This crate contains the core logic of the `speckit` tool – a scaffolding CLI that installs
//! and updates spec-driven development templates inside a project.
//!
//! `speckit` manages two directories in the target project, `.specify/` (scripts, memory,
//! specs) and `.cursor/` (editor commands and rules), keeping them in step with the templates
//! shipped alongside the binary while never touching user-authored files that live in between.
//!
//! This library is built for the `speckit` CLI, but you can also reuse it as a backend in other tools.
//!
//! ## Modules Overview
//! - [`copier`] – One-shot recursive template installation
//! - [`sync`] – Diff computation and application against the template tree
//! - [`backup`] – Timestamped snapshots of the managed directories
//! - [`manifest`] – The version marker and installed-file manifest
//! - [`gitignore`] – Keeping generated subpaths out of version control
//! - [`templates`] – Locating the bundled template tree
//! - [`util`] – Shared utilities (walking, manifest paths, permissions)

pub mod copier;
pub mod sync;
pub mod backup;
pub mod manifest;
pub mod gitignore;
pub mod templates;
pub mod util;

pub use backup::*;
pub use copier::*;
pub use gitignore::*;
pub use manifest::*;
pub use sync::*;
pub use templates::*;
pub use util::*;
