//! Subtrans - Batch Subtitle Translation
//!
//! Entry point: parses arguments, sets up logging, loads configuration
//! and dispatches to the translation workflow.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use subtrans::cli::{Args, Commands};
use subtrans::config::Config;
use subtrans::workflow::{FileOutcome, Workflow};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    let config = load_config(&args)?;

    match &args.command {
        Commands::Run { root } => {
            let workflow = Workflow::new(config)?;
            let report = workflow.process_directory(root).await?;

            println!("{}", report);
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Translate { input, output, force } => {
            let workflow = Workflow::new(config)?;
            match workflow.process_single_file(input, output.clone(), *force).await? {
                FileOutcome::Translated => println!("Translated: {}", input.display()),
                FileOutcome::Skipped => {
                    println!("Skipped (output exists, use --force to overwrite): {}", input.display())
                }
            }
        }
        Commands::Check => {
            let binary = config.oracle.binary_path.clone();
            let workflow = Workflow::new(config)?;
            let version = workflow.check_oracle().await?;
            println!("Oracle available: {} ({})", binary, version);
        }
        Commands::InitConfig { output } => {
            config.save_to_file(output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Config file (explicit or ./config.toml), then environment, then command line
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env_overrides();
    args.apply_overrides(&mut config);
    config.validate()?;

    info!(
        "Oracle: {} (model: {}), {} -> {}, batch size {}",
        config.oracle.binary_path,
        config.oracle.model.as_deref().unwrap_or("default"),
        config.translate.source_language,
        config.translate.target_language,
        config.translate.batch_size
    );

    Ok(config)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subtrans").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subtrans.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("subtrans.log").display()
    );

    Ok(())
}
