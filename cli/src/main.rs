// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # r2r Swarm Console
//!
//! The `r2r` binary is a thin client for the agent swarm backend.
//!
//! ## Commands
//!
//! - `r2r status` - Backend health, swarm state and diagnostics
//! - `r2r task <description> [--file <path>]` - Submit a directive
//! - `r2r launch --signature <sig>` - Activate the swarm
//! - `r2r dev:autofix` - Run tests and ask the swarm to heal failures
//! - `r2r docker:rebuild [--prune]` - Rebuild the container stack
//! - `r2r shell [--yolo]` - Interactive console
//!
//! Failures are printed as a single line; the exit code stays zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use r2r_console::backend::BackendClient;
use r2r_console::commands::{
    self, dev, launch, shell, status, task, AutofixArgs, LaunchArgs, RebuildArgs, ShellArgs,
    TaskArgs,
};
use r2r_console::config::{ConfigOverrides, ConsoleConfig};
use r2r_console::ConsoleError;

/// r2r - Sovereign swarm console
#[derive(Parser)]
#[command(name = "r2r")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery, must exist)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "R2R_BACKEND_URL", value_name = "URL")]
    backend_url: Option<String>,

    /// License key sent with every request
    #[arg(long, global = true, env = "R2R_LICENSE_KEY", hide_env_values = true)]
    license_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "R2R_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the health of the backend and swarm
    #[command(name = "status")]
    Status,

    /// Submit a task to the agent swarm
    #[command(name = "task")]
    Task(TaskArgs),

    /// Activate the swarm
    #[command(name = "launch")]
    Launch(LaunchArgs),

    /// Detect test failures and use the swarm to heal the codebase
    #[command(name = "dev:autofix")]
    Autofix(AutofixArgs),

    /// Clean and rebuild all containers
    #[command(name = "docker:rebuild")]
    Rebuild(RebuildArgs),

    /// Interactive console
    #[command(name = "shell")]
    Shell(ShellArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env.prod first so it wins over a local .env
    let _ = dotenvy::from_filename(".env.prod");
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let Some(command) = cli.command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        std::process::exit(1);
    };

    let config = ConsoleConfig::load(
        cli.config,
        ConfigOverrides {
            backend_url: cli.backend_url,
            license_key: cli.license_key,
        },
    )
    .context("Failed to load configuration")?;
    debug!("Using backend {}", config.backend_url);

    let client = BackendClient::new(&config)?;
    let mut stdout = std::io::stdout();

    let (outcome, label) = match command {
        Commands::Status => (status::run(&client, &mut stdout).await, "Status check failed"),
        Commands::Task(args) => (
            task::handle_command(args, &client, &mut stdout).await,
            "Task failed",
        ),
        Commands::Launch(args) => (
            launch::handle_command(args, &client, &mut stdout).await,
            "Activation failed",
        ),
        Commands::Autofix(args) => (
            dev::autofix(args, &client, &mut stdout).await,
            "Healing failed",
        ),
        Commands::Rebuild(args) => (dev::rebuild(args, &mut stdout).await, "Rebuild failed"),
        Commands::Shell(args) => (shell::handle_command(args, client).await, "Console failed"),
    };

    finish(outcome, label, &mut stdout)
}

/// Print a handled failure; the process still exits zero
fn finish(
    outcome: Result<(), ConsoleError>,
    label: &str,
    out: &mut std::io::Stdout,
) -> Result<()> {
    if let Err(e) = outcome {
        commands::report_failure(out, label, &e)?;
    }
    Ok(())
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
