//! Single-file install primitive

use super::policy::{InstallMethod, InstallPolicy};
use crate::paths::{absolutize, normalize, relative_path};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Whether an install wrote anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    Installed,
    /// Destination already existed and was left untouched
    Skipped,
}

/// Result of installing one template file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOutcome {
    /// Path relative to the template root
    pub name: PathBuf,
    pub method: InstallMethod,
    pub status: InstallStatus,
    /// Absolute destination path
    pub destination: PathBuf,
    /// Copy source, or the link text for symlinks
    pub source: PathBuf,
}

impl InstallOutcome {
    pub fn is_skipped(&self) -> bool {
        self.status == InstallStatus::Skipped
    }
}

/// Install `src_root/name` at `dst_root/name`.
///
/// Missing parent directories are created. Allow-listed names are copied;
/// everything else becomes a symlink whose text is relative to the link's
/// own directory, so the destination tree stays relocatable together with
/// the template tree. An existing destination, including a dangling symlink,
/// is reported as skipped and never written. Relative roots are resolved
/// against the current directory.
pub fn install_file(
    policy: &InstallPolicy,
    name: &Path,
    src_root: &Path,
    dst_root: &Path,
) -> crate::Result<InstallOutcome> {
    debug_assert!(src_root.is_dir(), "source root must be a directory");
    debug_assert!(dst_root.is_dir(), "destination root must be a directory");

    let src_root = absolutize(src_root).map_err(crate::Error::fs("resolve", src_root))?;
    let dst_root = absolutize(dst_root).map_err(crate::Error::fs("resolve", dst_root))?;
    let src_name = normalize(&src_root.join(name));
    let dst_name = normalize(&dst_root.join(name));
    let dst_dir = dst_name.parent().unwrap_or(&dst_root).to_path_buf();

    let method = policy.method_for(name);
    let source = match method {
        InstallMethod::Copy => src_name.clone(),
        InstallMethod::Symlink => relative_path(&src_name, &dst_dir),
    };

    let mut outcome = InstallOutcome {
        name: name.to_path_buf(),
        method,
        status: InstallStatus::Installed,
        destination: dst_name.clone(),
        source,
    };

    if std::fs::symlink_metadata(&dst_name).is_ok() {
        warn!(
            "Skipping {} {} -> {}: file exists",
            method,
            name.display(),
            outcome.source.display()
        );
        outcome.status = InstallStatus::Skipped;
        return Ok(outcome);
    }

    let io_err = |source: std::io::Error| crate::Error::Install {
        path: dst_name.clone(),
        source,
    };

    std::fs::create_dir_all(&dst_dir).map_err(io_err)?;

    info!(
        "Creating {} {} -> {}",
        method,
        name.display(),
        outcome.source.display()
    );
    match method {
        InstallMethod::Copy => {
            std::fs::copy(&src_name, &dst_name).map_err(io_err)?;
        }
        InstallMethod::Symlink => {
            make_symlink(&outcome.source, &dst_name).map_err(io_err)?;
        }
    }

    Ok(outcome)
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(src.join("proofs")).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(src.join("proofs").join("Makefile.common"), "common\n").unwrap();
        std::fs::write(src.join("proofs").join("Makefile-project-defines"), "defines\n").unwrap();
        (temp, src, dst)
    }

    #[test]
    fn test_symlink_is_relative_to_link_directory() {
        let (_temp, src, dst) = setup();
        let name = Path::new("proofs/Makefile.common");

        let outcome = install_file(&InstallPolicy::default(), name, &src, &dst).unwrap();

        assert_eq!(outcome.method, InstallMethod::Symlink);
        assert_eq!(outcome.status, InstallStatus::Installed);
        assert_eq!(outcome.source, PathBuf::from("../../src/proofs/Makefile.common"));

        let link = dst.join(name);
        let text = std::fs::read_link(&link).unwrap();
        assert!(text.is_relative());
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "common\n");
    }

    #[test]
    fn test_allow_listed_file_is_copied() {
        let (_temp, src, dst) = setup();
        let name = Path::new("proofs/Makefile-project-defines");

        let outcome = install_file(&InstallPolicy::default(), name, &src, &dst).unwrap();

        assert_eq!(outcome.method, InstallMethod::Copy);
        let installed = dst.join(name);
        assert!(!std::fs::symlink_metadata(&installed).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read(&installed).unwrap(), b"defines\n");
    }

    #[test]
    fn test_second_install_skips() {
        let (_temp, src, dst) = setup();
        let policy = InstallPolicy::default();
        let name = Path::new("proofs/Makefile.common");

        install_file(&policy, name, &src, &dst).unwrap();
        let again = install_file(&policy, name, &src, &dst).unwrap();

        assert!(again.is_skipped());
        assert_eq!(again.method, InstallMethod::Symlink);
    }

    #[test]
    fn test_existing_user_file_is_not_overwritten() {
        let (_temp, src, dst) = setup();
        let name = Path::new("proofs/Makefile-project-defines");
        std::fs::create_dir_all(dst.join("proofs")).unwrap();
        std::fs::write(dst.join(name), "edited by user\n").unwrap();

        let outcome = install_file(&InstallPolicy::default(), name, &src, &dst).unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(std::fs::read_to_string(dst.join(name)).unwrap(), "edited by user\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_existing() {
        let (_temp, src, dst) = setup();
        let name = Path::new("proofs/Makefile.common");
        std::fs::create_dir_all(dst.join("proofs")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", dst.join(name)).unwrap();

        let outcome = install_file(&InstallPolicy::default(), name, &src, &dst).unwrap();

        assert!(outcome.is_skipped());
        assert_eq!(
            std::fs::read_link(dst.join(name)).unwrap(),
            PathBuf::from("/nonexistent/target")
        );
    }

    #[test]
    fn test_missing_source_file_is_an_install_error() {
        let (_temp, src, dst) = setup();
        let name = Path::new("Makefile-project-testing");

        let result = install_file(&InstallPolicy::default(), name, &src, &dst);
        assert!(matches!(result, Err(crate::Error::Install { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_source_root_gives_resolvable_link() {
        let (_temp, src, dst) = setup();
        let name = Path::new("proofs/Makefile.common");
        let relative_src = relative_path(&src, &std::env::current_dir().unwrap());

        let outcome = install_file(&InstallPolicy::default(), name, &relative_src, &dst).unwrap();

        assert_eq!(outcome.source, PathBuf::from("../../src/proofs/Makefile.common"));
        assert_eq!(std::fs::read_to_string(dst.join(name)).unwrap(), "common\n");
    }
}
