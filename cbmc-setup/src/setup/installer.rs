//! Repository template installer

use super::roots::RootSet;
use crate::catalog::TemplateCatalog;
use crate::install::{copy_directory_contents, InstallPolicy, InstallReport};
use crate::paths::{relative_path, to_slash};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Generated fragment recording where the sources are
pub const DEFINES_FILE: &str = "Makefile-template-defines";

/// Installs the repository template into a CBMC root
pub struct Installer<'a> {
    catalog: &'a TemplateCatalog,
    roots: &'a RootSet,
    policy: InstallPolicy,
    defines_file: String,
}

impl<'a> Installer<'a> {
    /// Installer with the default copy-instead policy and defines file name
    pub fn new(catalog: &'a TemplateCatalog, roots: &'a RootSet) -> Self {
        Self {
            catalog,
            roots,
            policy: InstallPolicy::default(),
            defines_file: DEFINES_FILE.to_string(),
        }
    }

    /// Use a different copy-instead policy
    pub fn with_policy(mut self, policy: InstallPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name the generated defines fragment
    pub fn with_defines_file(mut self, name: impl Into<String>) -> Self {
        self.defines_file = name.into();
        self
    }

    /// Install the repository template and regenerate the defines fragment.
    ///
    /// File-level collisions and failures are recorded in the report; only
    /// precondition violations and failure to write the fragment abort.
    pub fn run(&self) -> crate::Result<InstallReport> {
        self.roots.validate()?;
        if !self.roots.source_root().is_dir() {
            return Err(crate::Error::Precondition(format!(
                "source root {} is not a directory",
                self.roots.source_root().display()
            )));
        }
        let templates = self.catalog.repository_templates();
        if !templates.is_dir() {
            return Err(crate::Error::Catalog(format!(
                "missing repository template {}",
                templates.display()
            )));
        }

        std::fs::create_dir_all(self.roots.cbmc_root())
            .map_err(crate::Error::fs("create", self.roots.cbmc_root()))?;
        info!(
            from = %templates.display(),
            to = %self.roots.cbmc_root().display(),
            "Installing repository template"
        );
        let report = copy_directory_contents(&self.policy, &templates, self.roots.cbmc_root())?;

        self.write_defines()?;
        Ok(report)
    }

    /// Path of the generated defines fragment
    pub fn defines_path(&self) -> PathBuf {
        self.roots.proof_root().join(&self.defines_file)
    }

    /// Write the defines fragment, overwriting any previous one.
    pub fn write_defines(&self) -> crate::Result<PathBuf> {
        let path = self.defines_path();
        std::fs::create_dir_all(self.roots.proof_root())
            .map_err(crate::Error::fs("create", self.roots.proof_root()))?;

        if std::fs::symlink_metadata(&path).is_ok() {
            warn!("Overwriting {}", path.display());
        }
        std::fs::write(
            &path,
            defines_content(self.roots.source_root(), self.roots.proof_root()),
        )
        .map_err(crate::Error::fs("write", &path))?;
        Ok(path)
    }
}

/// Content of the defines fragment
pub fn defines_content(source_root: &Path, proof_root: &Path) -> String {
    format!(
        "SRCDIR ?= $(abspath $(PROOF_ROOT)/{})\n",
        to_slash(&relative_path(source_root, proof_root))
    )
}
