//! Tree-wide installation
//!
//! Applies the install primitive to every file of a template tree. Per-file
//! failures are collected and the walk continues.

use super::policy::InstallPolicy;
use super::primitive::{install_file, InstallOutcome};
use crate::paths::absolutize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use walkdir::WalkDir;

/// A file that could not be installed
#[derive(Debug, Clone, Serialize)]
pub struct InstallFailure {
    pub name: PathBuf,
    pub error: String,
}

/// Aggregate result of installing a tree
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<InstallOutcome>,
    pub failures: Vec<InstallFailure>,
}

impl InstallReport {
    pub fn installed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Look up the outcome for a template-relative path
    pub fn outcome(&self, name: impl AsRef<Path>) -> Option<&InstallOutcome> {
        self.outcomes.iter().find(|o| o.name == name.as_ref())
    }
}

/// Every non-directory entry under `root`, relative to `root`, in sorted order.
///
/// Symlinks inside the template tree are listed, not followed. Entries the
/// walk cannot read are returned as failures and the walk carries on.
pub fn files_under_root(root: &Path) -> (Vec<PathBuf>, Vec<InstallFailure>) {
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                let error = crate::Error::Install {
                    path: path.clone(),
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
                };
                error!("{}", error);
                failures.push(InstallFailure {
                    name: path.strip_prefix(root).map(Path::to_path_buf).unwrap_or(path),
                    error: error.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.push(rel.to_path_buf());
        }
    }

    (files, failures)
}

/// Install the contents of `src` into `dst`.
///
/// Both must be existing directories. Relative roots are resolved against the
/// current directory first, so link text is always computed between absolute
/// paths. Skips and failures are tallied; a single notice is emitted at the
/// end when anything was skipped.
pub fn copy_directory_contents(
    policy: &InstallPolicy,
    src: &Path,
    dst: &Path,
) -> crate::Result<InstallReport> {
    let src = absolutize(src).map_err(crate::Error::fs("resolve", src))?;
    let dst = absolutize(dst).map_err(crate::Error::fs("resolve", dst))?;
    for (label, dir) in [("template", &src), ("destination", &dst)] {
        if !dir.is_dir() {
            return Err(crate::Error::Precondition(format!(
                "{} directory {} does not exist",
                label,
                dir.display()
            )));
        }
    }

    let (files, failures) = files_under_root(&src);
    let mut report = InstallReport {
        outcomes: Vec::with_capacity(files.len()),
        failures,
    };

    for name in files {
        match install_file(policy, &name, &src, &dst) {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(e) => {
                error!("{}", e);
                report.failures.push(InstallFailure {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    if report.skipped() > 0 {
        warn!("To overwrite a skipped file, delete the file and rerun the setup.");
    }
    if report.has_failures() {
        warn!("{} file(s) could not be installed", report.failures.len());
    }

    Ok(report)
}
