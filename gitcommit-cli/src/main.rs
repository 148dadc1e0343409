//! gitcommit CLI - Command line interface for gitcommit
//!
//! Checks out or creates a branch, stages, commits and pushes in a single
//! idempotent step and reports whether anything changed.

mod commands;
mod envelope;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gitcommit_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::RunArgs;
use envelope::FailureEnvelope;

/// gitcommit: idempotent branch, commit and push for git working trees
#[derive(Parser, Debug)]
#[command(name = "gitcommit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to git executable (overrides config and env)
    #[arg(long, global = true, env = "GITCOMMIT_GIT_PATH")]
    git_path: Option<String>,

    /// Remote to push to (overrides config and env)
    #[arg(long, global = true, env = "GITCOMMIT_REMOTE")]
    remote: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Check out a branch and optionally stage, commit and push
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON result
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            match serde_json::to_string(&FailureEnvelope::from_error(&e)) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration with overrides
    let config = Config::load_with_overrides(
        cli.config.as_deref(),
        cli.git_path.clone(),
        cli.remote.clone(),
    )?;

    if cli.verbose {
        tracing::info!(
            git = %config.git.executable,
            remote = %config.git.remote,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("gitcommit {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run(args)) => {
            args.execute(cli.verbose, &config)?;
        }
        Some(Commands::Config) => {
            println!("gitcommit Configuration");
            println!("=======================");
            println!();
            println!("Git Settings:");
            println!("  executable: {}", config.git.executable);
            println!("  remote: {}", config.git.remote);
            println!();
            println!("Defaults:");
            println!("  commit_message: {}", config.defaults.commit_message);
            println!();
            let path = cli.config.or_else(Config::default_config_path);
            if let Some(path) = path {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("gitcommit - idempotent branch, commit and push for git working trees");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
