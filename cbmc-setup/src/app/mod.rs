//! Application Layer
//!
//! User-facing CLI, configuration management and console prompts.

pub mod cli;
pub mod config;
pub mod prompt;

pub use cli::Cli;
pub use config::Config;
pub use prompt::Prompter;
