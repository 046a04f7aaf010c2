//! Console prompts
//!
//! Thin adapter that turns missing command-line values into questions.
//! Paths are `~`-expanded and made absolute before they reach the core.

use crate::paths::expand_path;
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const SOURCE_ROOT_QUESTION: &str = "What is the path to the source root:  ";
pub const PROOF_ROOT_QUESTION: &str = "What is the path to the proof root (the 'proofs' directory): ";
pub const FUNCTION_QUESTION: &str = "What is the function name?  ";
pub const SOURCE_FILE_QUESTION: &str = "What is the source file that defines the function?  ";

/// Reads answers from `input`, writing questions to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompter over the process console
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompter reading answers from `input` and writing questions to `output`
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask a question and return the trimmed answer.
    pub fn ask(&mut self, question: &str) -> crate::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(crate::Error::Precondition(format!(
                "no answer to '{}'",
                question.trim()
            )));
        }
        Ok(answer.trim().to_string())
    }

    /// Ask for a path, expanding `~` and making it absolute.
    pub fn ask_path(&mut self, question: &str) -> crate::Result<PathBuf> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            return Err(crate::Error::Precondition(format!(
                "empty answer to '{}'",
                question.trim()
            )));
        }
        Ok(expand_path(&answer)?)
    }

    /// Use `given` when present, otherwise ask.
    pub fn value_or_ask(&mut self, given: Option<String>, question: &str) -> crate::Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.ask(question),
        }
    }

    /// Use `given` when present, otherwise ask; either way expanded.
    pub fn path_or_ask(&mut self, given: Option<&str>, question: &str) -> crate::Result<PathBuf> {
        match given {
            Some(value) => Ok(expand_path(value)?),
            None => self.ask_path(question),
        }
    }
}
