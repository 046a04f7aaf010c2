//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CBMC Setup - Scaffold CBMC proof projects from a template catalog
#[derive(Parser, Debug)]
#[command(name = "cbmc-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Template catalog directory (containing template-for-repository)
    #[arg(short, long, global = true)]
    pub templates: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the repository template into a CBMC root
    Setup {
        /// Root of the source code under verification
        #[arg(short, long)]
        source_root: Option<String>,

        /// CBMC root that will contain the proofs directory
        #[arg(long, default_value = ".")]
        cbmc_root: String,

        /// Print the install report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a proof directory for one function
    Proof {
        /// Function under proof
        #[arg(short, long)]
        function: Option<String>,

        /// Source file that defines the function
        #[arg(long)]
        source_file: Option<String>,

        /// Root of the source code under verification
        #[arg(short, long)]
        source_root: Option<String>,

        /// Proof root (the 'proofs' directory)
        #[arg(short, long)]
        proof_root: Option<String>,

        /// Directory to create the proof in
        #[arg(short, long, default_value = ".")]
        dir: String,
    },

    /// Regenerate cbmc-batch.yaml files with the build tool
    Prepare {
        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Stop at the first failing directory
        #[arg(long)]
        fail_fast: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
