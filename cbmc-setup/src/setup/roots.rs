//! Root Set

use crate::catalog::PROOF_DIR;
use std::path::{Path, PathBuf};

/// The three independently located roots every operation works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSet {
    source_root: PathBuf,
    cbmc_root: PathBuf,
    proof_root: PathBuf,
}

impl RootSet {
    /// Root set from three explicit roots
    pub fn new(
        source_root: impl Into<PathBuf>,
        cbmc_root: impl Into<PathBuf>,
        proof_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            cbmc_root: cbmc_root.into(),
            proof_root: proof_root.into(),
        }
    }

    /// Roots with the proof root at the conventional `<cbmc_root>/proofs`
    pub fn from_cbmc_root(source_root: impl Into<PathBuf>, cbmc_root: impl Into<PathBuf>) -> Self {
        let cbmc_root = cbmc_root.into();
        let proof_root = cbmc_root.join(PROOF_DIR);
        Self::new(source_root, cbmc_root, proof_root)
    }

    /// Where the verified sources live
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Project directory containing the proof root
    pub fn cbmc_root(&self) -> &Path {
        &self.cbmc_root
    }

    /// Directory holding the individual proof directories
    pub fn proof_root(&self) -> &Path {
        &self.proof_root
    }

    /// All roots must be absolute.
    pub fn validate(&self) -> crate::Result<()> {
        for (label, root) in [
            ("source root", &self.source_root),
            ("cbmc root", &self.cbmc_root),
            ("proof root", &self.proof_root),
        ] {
            if !root.is_absolute() {
                return Err(crate::Error::Precondition(format!(
                    "{} must be absolute, got {}",
                    label,
                    root.display()
                )));
            }
        }
        Ok(())
    }
}
