//! # CBMC Setup
//!
//! Scaffolds CBMC proof projects from a shared template catalog.
//!
//! ## Overview
//!
//! A template catalog holds two directory trees:
//!
//! - a *repository template*, installed once per project into the CBMC root
//! - a *proof template*, stamped out once per function under proof
//!
//! Installing the repository template links every file back into the catalog,
//! except for a small allow-list of files that users are expected to edit,
//! which are copied instead. Existing files are never overwritten.
//!
//! Instantiating the proof template creates a fresh directory named after the
//! function, rewrites four placeholder tokens in every template file and
//! renames the generic harness to `<function>_harness.c`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cbmc_setup::{Installer, Instantiator, ProofRequest, RootSet, TemplateCatalog};
//!
//! let catalog = TemplateCatalog::new("/opt/cbmc-templates");
//! let roots = RootSet::from_cbmc_root("/work/project/source", "/work/project/test/cbmc");
//!
//! // One-time project setup
//! let report = Installer::new(&catalog, &roots).run()?;
//! println!("{} installed, {} skipped", report.installed(), report.skipped());
//!
//! // One proof per function
//! let request = ProofRequest::new(
//!     "parse_header",
//!     "/work/project/source/parse.c",
//!     roots.proof_root(),
//! );
//! let proof = Instantiator::new(&catalog, &roots).instantiate(&request)?;
//! println!("created {}", proof.directory.display());
//! # Ok::<(), cbmc_setup::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`paths`]: relative path computation and console path expansion
//! - [`catalog`]: template catalog location and layout
//! - [`install`]: copy-or-link policy and the tree install primitive
//! - [`setup`]: root set, installer, placeholder engine, instantiator
//! - [`prepare`]: batch-config regeneration through the build tool
//! - [`app`]: CLI, configuration and console prompts

pub mod paths;
pub mod catalog;
pub mod install;
pub mod setup;
pub mod prepare;
pub mod app;

// Re-export commonly used types
pub use catalog::TemplateCatalog;
pub use install::{InstallMethod, InstallOutcome, InstallPolicy, InstallReport, InstallStatus};
pub use prepare::{BatchConfigRegenerator, CommandTool, PrepareReport};
pub use setup::{Installer, Instantiator, ProofOutcome, ProofRequest, RootSet};

use std::path::PathBuf;

/// Result type alias for cbmc-setup
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cbmc-setup
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Proof already exists: {}", .0.display())]
    ProofExists(PathBuf),

    #[error("Template catalog error: {0}")]
    Catalog(String),

    #[error(
        "Failed to create {target} in {}: command was '{command}': error was '{stderr}'",
        dir.display()
    )]
    BuildTool {
        target: String,
        dir: PathBuf,
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Failed to install {}: {source}", path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap an I/O error with the operation and the path it failed on
    pub(crate) fn fs(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Filesystem { action, path, source }
    }
}
