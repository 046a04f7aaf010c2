//! Install Policy
//!
//! Decides whether a template file is copied or symlinked into a project.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Files users are expected to edit. Copying them keeps the shared template
/// checkout clean when they are modified.
pub const COPY_INSTEAD: &[&str] = &[
    "Makefile-project-defines",
    "Makefile-project-targets",
    "Makefile-project-testing",
    ".gitignore",
];

/// How a template file is materialized at its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// Duplicate the file bytes
    Copy,
    /// Relative symbolic link back into the template tree
    Symlink,
}

impl InstallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Symlink => "symlink",
        }
    }
}

impl std::fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allow-list of file names that are copied; everything else is linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPolicy {
    copy_instead: Vec<String>,
}

impl InstallPolicy {
    /// Policy copying exactly the given file names
    pub fn new<I, S>(copy_instead: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            copy_instead: copy_instead.into_iter().map(Into::into).collect(),
        }
    }

    /// File names that are always copied
    pub fn copy_instead(&self) -> &[String] {
        &self.copy_instead
    }

    /// Classify a template-relative path by its base name.
    pub fn method_for(&self, name: &Path) -> InstallMethod {
        let base = name.file_name().map(|n| n.to_string_lossy());
        match base {
            Some(base) if self.copy_instead.iter().any(|c| *c == base) => InstallMethod::Copy,
            _ => InstallMethod::Symlink,
        }
    }
}

impl Default for InstallPolicy {
    fn default() -> Self {
        Self::new(COPY_INSTEAD.iter().copied())
    }
}
