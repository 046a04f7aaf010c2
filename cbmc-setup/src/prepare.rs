//! Batch-config regeneration
//!
//! Walks a tree and asks the build tool to rebuild `cbmc-batch.yaml` in
//! every directory that has both a `Makefile` and an existing
//! `cbmc-batch.yaml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Build recipe file name
pub const MAKEFILE: &str = "Makefile";

/// Batch config file name
pub const CBMC_BATCH_YAML: &str = "cbmc-batch.yaml";

/// Exit status and captured error stream of one build tool run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can force-rebuild a make target in a directory
pub trait BuildTool {
    /// The full command line used for `target`, for error reports
    fn command_line(&self, target: &str) -> Vec<String>;

    /// Run the tool in `dir`. Only failure to launch is an `Err`.
    fn run(&self, dir: &Path, target: &str) -> std::io::Result<ToolOutput>;
}

/// External process build tool, `make -B <target>` by default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTool {
    words: Vec<String>,
}

impl CommandTool {
    /// Tool invoked as `words... <target>`
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for CommandTool {
    fn default() -> Self {
        Self::new(["make", "-B"])
    }
}

impl BuildTool for CommandTool {
    fn command_line(&self, target: &str) -> Vec<String> {
        let mut line = self.words.clone();
        line.push(target.to_string());
        line
    }

    fn run(&self, dir: &Path, target: &str) -> std::io::Result<ToolOutput> {
        let (program, args) = self.words.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty build command")
        })?;

        let output = Command::new(program)
            .args(args)
            .arg(target)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()?;

        Ok(ToolOutput {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Outcome of one regeneration pass
#[derive(Debug, Default)]
pub struct PrepareReport {
    pub regenerated: Vec<PathBuf>,
    pub failures: Vec<crate::Error>,
}

impl PrepareReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Regenerates batch configs under a root
pub struct BatchConfigRegenerator<T: BuildTool = CommandTool> {
    tool: T,
    makefile: String,
    batch_file: String,
    continue_on_error: bool,
}

impl<T: BuildTool> BatchConfigRegenerator<T> {
    /// Regenerator using `tool` and the standard file names
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            makefile: MAKEFILE.to_string(),
            batch_file: CBMC_BATCH_YAML.to_string(),
            continue_on_error: true,
        }
    }

    /// Override the build recipe and batch config file names
    pub fn with_file_names(mut self, makefile: &str, batch_file: &str) -> Self {
        self.makefile = makefile.to_string();
        self.batch_file = batch_file.to_string();
        self
    }

    /// Stop at the first failing directory instead of collecting failures
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.continue_on_error = !fail_fast;
        self
    }

    /// Directories under `root` holding both the recipe and the batch config
    pub fn find_batch_dirs(&self, root: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let dir = entry.path();
            if dir.join(&self.makefile).is_file() && dir.join(&self.batch_file).is_file() {
                dirs.push(dir.to_path_buf());
            }
        }

        dirs
    }

    /// Regenerate the batch config in a single directory.
    pub fn regenerate(&self, dir: &Path) -> crate::Result<()> {
        let command = self.tool.command_line(&self.batch_file).join(" ");
        let output = self.tool.run(dir, &self.batch_file).unwrap_or_else(|e| ToolOutput {
            status: None,
            stderr: e.to_string(),
        });

        if output.success() {
            info!(dir = %dir.display(), "Regenerated {}", self.batch_file);
            return Ok(());
        }

        Err(crate::Error::BuildTool {
            target: self.batch_file.clone(),
            dir: dir.to_path_buf(),
            command,
            status: output.status,
            stderr: output.stderr.trim().to_string(),
        })
    }

    /// Regenerate every batch config under `root`.
    ///
    /// With the default policy a failing directory is recorded and the walk
    /// moves on; in fail-fast mode the first failure is returned as `Err`.
    pub fn run(&self, root: &Path) -> crate::Result<PrepareReport> {
        if !root.is_dir() {
            return Err(crate::Error::Precondition(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let mut report = PrepareReport::default();
        for dir in self.find_batch_dirs(root) {
            match self.regenerate(&dir) {
                Ok(()) => report.regenerated.push(dir),
                Err(e) if self.continue_on_error => {
                    error!("{}", e);
                    report.failures.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        if !report.failures.is_empty() {
            warn!(
                "{} of {} batch configs failed to regenerate",
                report.failures.len(),
                report.failures.len() + report.regenerated.len()
            );
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Fails in any directory whose name starts with "bad"
    struct FakeTool {
        calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeTool {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl BuildTool for FakeTool {
        fn command_line(&self, target: &str) -> Vec<String> {
            vec!["make".to_string(), "-B".to_string(), target.to_string()]
        }

        fn run(&self, dir: &Path, _target: &str) -> std::io::Result<ToolOutput> {
            self.calls.borrow_mut().push(dir.to_path_buf());
            let bad = dir
                .file_name()
                .map(|n| n.to_string_lossy().starts_with("bad"))
                .unwrap_or(false);
            Ok(if bad {
                ToolOutput {
                    status: Some(2),
                    stderr: "make: *** No rule to make target\n".to_string(),
                }
            } else {
                ToolOutput {
                    status: Some(0),
                    stderr: String::new(),
                }
            })
        }
    }

    fn proof_dir(root: &Path, name: &str, batch: bool) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MAKEFILE), "all:\n").unwrap();
        if batch {
            std::fs::write(dir.join(CBMC_BATCH_YAML), "jobos: ubuntu16\n").unwrap();
        }
        dir
    }

    #[test]
    fn test_find_batch_dirs_requires_both_files() {
        let temp = TempDir::new().unwrap();
        let a = proof_dir(temp.path(), "a", true);
        proof_dir(temp.path(), "b", false);
        std::fs::create_dir_all(temp.path().join("c")).unwrap();
        std::fs::write(temp.path().join("c").join(CBMC_BATCH_YAML), "").unwrap();

        let regen = BatchConfigRegenerator::new(FakeTool::new());
        assert_eq!(regen.find_batch_dirs(temp.path()), vec![a]);
    }

    #[test]
    fn test_failure_reported_and_siblings_processed() {
        let temp = TempDir::new().unwrap();
        let a = proof_dir(temp.path(), "a_proof", true);
        let bad = proof_dir(temp.path(), "bad_proof", true);
        let z = proof_dir(temp.path(), "z_proof", true);

        let regen = BatchConfigRegenerator::new(FakeTool::new());
        let report = regen.run(temp.path()).unwrap();

        assert_eq!(report.regenerated, vec![a, z]);
        assert_eq!(report.failures.len(), 1);
        match &report.failures[0] {
            crate::Error::BuildTool { dir, command, stderr, status, .. } => {
                assert_eq!(dir, &bad);
                assert_eq!(command, "make -B cbmc-batch.yaml");
                assert_eq!(stderr, "make: *** No rule to make target");
                assert_eq!(*status, Some(2));
            }
            other => panic!("unexpected error {other:?}"),
        }
        let message = report.failures[0].to_string();
        assert!(message.starts_with("Failed to create cbmc-batch.yaml in "));
        assert!(message.contains("command was 'make -B cbmc-batch.yaml'"));
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        proof_dir(temp.path(), "a_proof", true);
        proof_dir(temp.path(), "bad_proof", true);
        proof_dir(temp.path(), "z_proof", true);

        let regen = BatchConfigRegenerator::new(FakeTool::new()).fail_fast(true);
        let result = regen.run(temp.path());

        assert!(matches!(result, Err(crate::Error::BuildTool { .. })));
        assert_eq!(regen.tool.calls.borrow().len(), 2);
    }

    #[test]
    fn test_run_requires_directory() {
        let regen = BatchConfigRegenerator::new(FakeTool::new());
        let result = regen.run(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(crate::Error::Precondition(_))));
    }

    #[test]
    fn test_command_tool_command_line() {
        assert_eq!(
            CommandTool::default().command_line(CBMC_BATCH_YAML),
            vec!["make", "-B", "cbmc-batch.yaml"]
        );
    }

    #[test]
    fn test_empty_command_is_launch_failure() {
        let temp = TempDir::new().unwrap();
        let dir = proof_dir(temp.path(), "p", true);
        let regen = BatchConfigRegenerator::new(CommandTool::new(Vec::<String>::new()));

        let result = regen.regenerate(&dir);
        assert!(matches!(result, Err(crate::Error::BuildTool { status: None, .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_tool_captures_stderr_and_status() {
        let temp = TempDir::new().unwrap();
        let tool = CommandTool::new(["sh", "-c", "echo \"cannot build $1\" >&2; exit 3", "sh"]);

        let output = tool.run(temp.path(), CBMC_BATCH_YAML).unwrap();

        assert_eq!(output.status, Some(3));
        assert_eq!(output.stderr.trim(), "cannot build cbmc-batch.yaml");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_tool_runs_in_directory() {
        let temp = TempDir::new().unwrap();
        let tool = CommandTool::new(["sh", "-c", "touch \"$1\"", "sh"]);

        let output = tool.run(temp.path(), "marker").unwrap();

        assert!(output.success());
        assert!(temp.path().join("marker").exists());
    }
}
