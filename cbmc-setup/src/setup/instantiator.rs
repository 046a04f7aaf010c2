//! Proof template instantiation
//!
//! Creates one proof directory per function:
//!
//! 1. validate inputs
//! 2. create `<location>/<function>`, failing if it exists
//! 3. copy each proof template file with placeholders substituted
//! 4. rename `FUNCTION_harness.<ext>` to `<function>_harness.<ext>`
//!
//! There is no rollback. If step 3 or 4 fails the directory is left as is and
//! must be deleted before retrying.

use super::placeholder::Substitutions;
use super::roots::RootSet;
use crate::catalog::{TemplateCatalog, HARNESS_STEM};
use crate::paths::normalize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to instantiate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofRequest {
    /// Function under proof
    pub function: String,
    /// Absolute path of the file defining the function
    pub source_file: PathBuf,
    /// Absolute directory the proof directory is created in
    pub location: PathBuf,
}

impl ProofRequest {
    /// Request a proof for `function`, created under `location`
    pub fn new(
        function: impl Into<String>,
        source_file: impl Into<PathBuf>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            function: function.into(),
            source_file: source_file.into(),
            location: location.into(),
        }
    }

    /// Directory that will be created
    pub fn proof_dir(&self) -> PathBuf {
        normalize(&self.location.join(&self.function))
    }
}

/// A freshly created proof directory
#[derive(Debug, Clone)]
pub struct ProofOutcome {
    pub directory: PathBuf,
    /// Files written, by final name
    pub files: Vec<PathBuf>,
    pub harness: PathBuf,
}

/// Stamps out proof directories from the proof template
pub struct Instantiator<'a> {
    catalog: &'a TemplateCatalog,
    roots: &'a RootSet,
}

impl<'a> Instantiator<'a> {
    /// Instantiator reading `catalog` and substituting paths from `roots`
    pub fn new(catalog: &'a TemplateCatalog, roots: &'a RootSet) -> Self {
        Self { catalog, roots }
    }

    /// Create the proof directory for `request` and fill it from the proof template
    pub fn instantiate(&self, request: &ProofRequest) -> crate::Result<ProofOutcome> {
        self.check_preconditions(request)?;

        let template_dir = self.catalog.proof_templates();
        let templates = proof_template_filenames(&template_dir)?;

        let proof_dir = request.proof_dir();
        create_proof_dir(&proof_dir)?;
        info!(function = %request.function, dir = %proof_dir.display(), "Created proof directory");

        let subs = Substitutions::compute(
            &request.function,
            &request.source_file,
            self.roots.source_root(),
            self.roots.proof_root(),
            &proof_dir,
        );
        debug!(?subs, "Placeholder values");

        let mut files = Vec::with_capacity(templates.len());
        for name in &templates {
            let template = template_dir.join(name);
            let text = std::fs::read_to_string(&template)
                .map_err(crate::Error::fs("read", &template))?;
            let target = proof_dir.join(name);
            std::fs::write(&target, subs.apply(&text))
                .map_err(crate::Error::fs("write", &target))?;
            files.push(PathBuf::from(name));
        }

        let harness = rename_proof_harness(&request.function, &proof_dir, &templates)?;
        for file in files.iter_mut() {
            if file.file_stem().map(|s| s == HARNESS_STEM).unwrap_or(false) {
                *file = harness.clone();
            }
        }

        info!(harness = %harness.display(), "Proof ready");
        Ok(ProofOutcome {
            directory: proof_dir.clone(),
            files,
            harness: proof_dir.join(harness),
        })
    }

    fn check_preconditions(&self, request: &ProofRequest) -> crate::Result<()> {
        if !is_identifier(&request.function) {
            return Err(crate::Error::Precondition(format!(
                "function name '{}' is not a C identifier",
                request.function
            )));
        }
        self.roots.validate()?;

        let checks = [
            ("source root", self.roots.source_root(), true),
            ("proof root", self.roots.proof_root(), true),
            ("proof location", request.location.as_path(), true),
            ("source file", request.source_file.as_path(), false),
        ];
        for (label, path, want_dir) in checks {
            let ok = if want_dir { path.is_dir() } else { path.is_file() };
            if !ok {
                return Err(crate::Error::Precondition(format!(
                    "{} {} does not exist",
                    label,
                    path.display()
                )));
            }
        }
        for (label, path) in [
            ("source file", &request.source_file),
            ("proof location", &request.location),
        ] {
            if !path.is_absolute() {
                return Err(crate::Error::Precondition(format!(
                    "{} must be absolute, got {}",
                    label,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// File names directly inside the proof template, sorted
pub fn proof_template_filenames(template_dir: &Path) -> crate::Result<Vec<String>> {
    let entries = std::fs::read_dir(template_dir).map_err(|e| {
        crate::Error::Catalog(format!(
            "cannot read proof template {}: {}",
            template_dir.display(),
            e
        ))
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(crate::Error::fs("read", template_dir))?;
        if !entry.path().is_file() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Create the proof directory atomically; an existing path is a collision.
fn create_proof_dir(dir: &Path) -> crate::Result<()> {
    match std::fs::create_dir(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(crate::Error::ProofExists(dir.to_path_buf()))
        }
        Err(e) => Err(crate::Error::fs("create", dir)(e)),
    }
}

/// Rename the generic harness in `proof_dir`, returning its new file name.
fn rename_proof_harness(
    function: &str,
    proof_dir: &Path,
    templates: &[String],
) -> crate::Result<PathBuf> {
    let generic = templates
        .iter()
        .find(|name| Path::new(name).file_stem().map(|s| s == HARNESS_STEM).unwrap_or(false))
        .ok_or_else(|| {
            crate::Error::Catalog(format!("proof template has no {} file", HARNESS_STEM))
        })?;

    let renamed = match Path::new(generic).extension() {
        Some(ext) => format!("{}_harness.{}", function, ext.to_string_lossy()),
        None => format!("{}_harness", function),
    };
    let from = proof_dir.join(generic);
    std::fs::rename(&from, proof_dir.join(&renamed))
        .map_err(crate::Error::fs("rename", &from))?;
    Ok(PathBuf::from(renamed))
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
