//! Template Catalog
//!
//! The pair of directory trees new projects and proofs are stamped out from.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory holding files installed once per project
pub const REPOSITORY_TEMPLATES: &str = "template-for-repository";

/// Directory holding files installed once per proof
pub const PROOF_TEMPLATES: &str = "template-for-proof";

/// Name of the proof root under the CBMC root
pub const PROOF_DIR: &str = "proofs";

/// Stem of the generic harness file in the proof template
pub const HARNESS_STEM: &str = "FUNCTION_harness";

/// Location of a template catalog on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    root: PathBuf,
    repository_dir: String,
    proof_dir: String,
}

impl TemplateCatalog {
    /// Catalog rooted at `root` with the standard directory names
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            repository_dir: REPOSITORY_TEMPLATES.to_string(),
            proof_dir: PROOF_TEMPLATES.to_string(),
        }
    }

    /// Override the names of the two template directories
    pub fn with_dir_names(mut self, repository_dir: &str, proof_dir: &str) -> Self {
        self.repository_dir = repository_dir.to_string();
        self.proof_dir = proof_dir.to_string();
        self
    }

    /// Catalog root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Repository template tree
    pub fn repository_templates(&self) -> PathBuf {
        self.root.join(&self.repository_dir)
    }

    /// Proof template tree
    pub fn proof_templates(&self) -> PathBuf {
        self.root.join(&self.proof_dir)
    }

    /// Check that both template trees exist.
    pub fn verify(&self) -> crate::Result<()> {
        for dir in [self.repository_templates(), self.proof_templates()] {
            if !dir.is_dir() {
                return Err(crate::Error::Catalog(format!(
                    "missing template directory {}",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Locate the catalog relative to the running executable.
    ///
    /// Each ancestor of the executable is tried, both as the catalog root
    /// itself and through a `templates/` child.
    pub fn locate() -> crate::Result<Self> {
        let exe = std::env::current_exe()?;
        Self::locate_from(&exe).ok_or_else(|| {
            crate::Error::Catalog(format!(
                "no template catalog found above {}; pass --templates",
                exe.display()
            ))
        })
    }

    /// Search `start` and its ancestors for a catalog.
    pub fn locate_from(start: &Path) -> Option<Self> {
        for dir in start.ancestors() {
            for candidate in [dir.to_path_buf(), dir.join("templates")] {
                let catalog = Self::new(&candidate);
                if catalog.verify().is_ok() {
                    debug!(root = %candidate.display(), "Found template catalog");
                    return Some(catalog);
                }
            }
        }
        None
    }
}
