//! CBMC Setup - proof project scaffolding
//!
//! Installs the repository template, creates proof directories and
//! regenerates batch configs.

use cbmc_setup::app::cli::{Cli, Commands, ConfigAction};
use cbmc_setup::app::config::Config;
use cbmc_setup::app::prompt::{
    Prompter, FUNCTION_QUESTION, PROOF_ROOT_QUESTION, SOURCE_FILE_QUESTION, SOURCE_ROOT_QUESTION,
};
use cbmc_setup::paths::expand_path;
use cbmc_setup::prepare::{BatchConfigRegenerator, CommandTool};
use cbmc_setup::setup::{Installer, Instantiator, ProofRequest, RootSet};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };
    let templates = cli.templates.as_deref();

    match cli.command {
        Commands::Setup {
            source_root,
            cbmc_root,
            json,
        } => {
            run_setup(source_root, &cbmc_root, json, templates, &config)?;
        }
        Commands::Proof {
            function,
            source_file,
            source_root,
            proof_root,
            dir,
        } => {
            run_proof(function, source_file, source_root, proof_root, &dir, templates, &config)?;
        }
        Commands::Prepare { root, fail_fast } => {
            run_prepare(&root, fail_fast, &config)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

fn run_setup(
    source_root: Option<String>,
    cbmc_root: &str,
    json: bool,
    templates: Option<&Path>,
    config: &Config,
) -> anyhow::Result<()> {
    let catalog = config.catalog(templates)?;

    let mut prompter = Prompter::stdio();
    let source_root = prompter.path_or_ask(source_root.as_deref(), SOURCE_ROOT_QUESTION)?;
    let cbmc_root = expand_path(cbmc_root)?;
    let proof_root = cbmc_root.join(&config.layout.proof_root_name);
    let roots = RootSet::new(source_root, cbmc_root, proof_root);

    let installer = Installer::new(&catalog, &roots)
        .with_policy(config.install_policy())
        .with_defines_file(config.layout.defines_file.clone());
    let report = installer.run()?;

    info!(
        "Installed {} files, skipped {}, wrote {}",
        report.installed(),
        report.skipped(),
        installer.defines_path().display()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.has_failures() {
        for failure in &report.failures {
            error!("  - {}: {}", failure.name.display(), failure.error);
        }
        anyhow::bail!("{} template files could not be installed", report.failures.len());
    }

    Ok(())
}

fn run_proof(
    function: Option<String>,
    source_file: Option<String>,
    source_root: Option<String>,
    proof_root: Option<String>,
    dir: &str,
    templates: Option<&Path>,
    config: &Config,
) -> anyhow::Result<()> {
    let catalog = config.catalog(templates)?;

    let mut prompter = Prompter::stdio();
    let function = prompter.value_or_ask(function, FUNCTION_QUESTION)?;
    let source_file = prompter.path_or_ask(source_file.as_deref(), SOURCE_FILE_QUESTION)?;
    let source_root = prompter.path_or_ask(source_root.as_deref(), SOURCE_ROOT_QUESTION)?;
    let proof_root = prompter.path_or_ask(proof_root.as_deref(), PROOF_ROOT_QUESTION)?;

    let cbmc_root = proof_root
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| proof_root.clone());
    let roots = RootSet::new(source_root, cbmc_root, proof_root);
    let request = ProofRequest::new(function, source_file, expand_path(dir)?);

    let proof = Instantiator::new(&catalog, &roots).instantiate(&request)?;

    println!("Created proof in {}", proof.directory.display());
    for file in &proof.files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn run_prepare(root: &Path, fail_fast: bool, config: &Config) -> anyhow::Result<()> {
    let prepare = &config.prepare;
    let regenerator = BatchConfigRegenerator::new(CommandTool::new(prepare.command.iter().cloned()))
        .with_file_names(&prepare.makefile, &prepare.batch_file)
        .fail_fast(fail_fast || !prepare.continue_on_error);

    let report = regenerator.run(root)?;

    info!("Regenerated {} batch configs", report.regenerated.len());
    if !report.is_success() {
        anyhow::bail!("{} directories failed", report.failures.len());
    }

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    if config.templates.root.is_none() {
        warn!("templates.root is unset; the catalog is searched next to the executable");
    }

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
        }
    }

    Ok(())
}
