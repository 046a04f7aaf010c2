//! Placeholder tokens in proof templates
//!
//! Substitution is a literal replace of fixed tokens. There is no escaping,
//! so a template must not contain a token anywhere except where it is meant
//! to be replaced.

use crate::paths::{relative_path, to_slash};
use std::path::Path;

pub const FUNCTION_NAME: &str = "<__FUNCTION_NAME__>";
pub const PATH_TO_MAKEFILE: &str = "<__PATH_TO_MAKEFILE__>";
pub const PATH_TO_PROOF_ROOT: &str = "<__PATH_TO_PROOF_ROOT__>";
pub const PATH_TO_SOURCE_FILE: &str = "<__PATH_TO_SOURCE_FILE__>";

/// Values for the four tokens, computed once per proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    pub function: String,
    /// Proof root relative to the proof directory
    pub path_to_makefile: String,
    /// Proof root relative to the source root
    pub path_to_proof_root: String,
    /// Source file relative to the source root
    pub path_to_source_file: String,
}

impl Substitutions {
    pub fn compute(
        function: &str,
        source_file: &Path,
        source_root: &Path,
        proof_root: &Path,
        proof_dir: &Path,
    ) -> Self {
        Self {
            function: function.to_string(),
            path_to_makefile: to_slash(&relative_path(proof_root, proof_dir)),
            path_to_proof_root: to_slash(&relative_path(proof_root, source_root)),
            path_to_source_file: to_slash(&relative_path(source_file, source_root)),
        }
    }

    /// Token/value pairs in application order
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (FUNCTION_NAME, self.function.as_str()),
            (PATH_TO_MAKEFILE, self.path_to_makefile.as_str()),
            (PATH_TO_PROOF_ROOT, self.path_to_proof_root.as_str()),
            (PATH_TO_SOURCE_FILE, self.path_to_source_file.as_str()),
        ]
    }

    /// Replace every token occurrence in one line.
    pub fn apply_line(&self, line: &str) -> String {
        self.pairs()
            .iter()
            .fold(line.to_string(), |acc, &(token, value)| acc.replace(token, value))
    }

    /// Apply line by line, keeping a trailing newline if the input had one.
    pub fn apply(&self, text: &str) -> String {
        let mut out: Vec<String> = text.lines().map(|l| self.apply_line(l)).collect();
        if text.ends_with('\n') {
            out.push(String::new());
        }
        out.join("\n")
    }
}
