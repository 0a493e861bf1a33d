// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Local developer tooling
//!
//! Commands: dev:autofix, docker:rebuild
//!
//! Both shell out to local tools. A tool that cannot start or exits non-zero
//! surfaces as [`ConsoleError::LocalToolFailure`], except the test runner in
//! `dev:autofix`, whose failure output is handed to the swarm instead.

use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::info;

use crate::backend::{BackendClient, Directive};
use crate::error::ConsoleError;

pub const DEFAULT_TEST_COMMAND: &str = "npm test";
pub const DEFAULT_COMPOSE_FILE: &str = "infra/docker/docker-compose.yml";

/// Characters of test output forwarded to the swarm
const HEALING_LOG_LIMIT: usize = 1000;

#[derive(Args, Debug)]
pub struct AutofixArgs {
    /// Test command, run through `sh -c`
    #[arg(long, default_value = DEFAULT_TEST_COMMAND, value_name = "CMD")]
    pub test_command: String,
}

#[derive(Args, Debug)]
pub struct RebuildArgs {
    /// Prune all docker resources before build
    #[arg(short, long)]
    pub prune: bool,

    /// Compose file describing the containers
    #[arg(long, default_value = DEFAULT_COMPOSE_FILE, value_name = "FILE")]
    pub compose_file: PathBuf,
}

/// Run the test suite; on failure ask the swarm for a patch
pub async fn autofix<W: Write>(
    args: AutofixArgs,
    client: &BackendClient,
    out: &mut W,
) -> Result<(), ConsoleError> {
    writeln!(out, "{}", "Initiating self-healing protocol...".magenta())?;
    writeln!(out, "{}", format!("Running test suite: {}", args.test_command).blue())?;

    let output = Command::new("sh")
        .arg("-c")
        .arg(&args.test_command)
        .output()
        .await
        .map_err(|e| ConsoleError::LocalToolFailure {
            tool: args.test_command.clone(),
            code: None,
            output: e.to_string(),
        })?;

    if output.status.success() {
        writeln!(out, "{}", "✓ All tests passing. No healing required.".green())?;
        return Ok(());
    }

    let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
    log.push_str(&String::from_utf8_lossy(&output.stderr));
    info!(
        "Test command exited with {:?}, forwarding {} bytes of output",
        output.status.code(),
        log.len()
    );

    writeln!(
        out,
        "{}",
        "⚠ Failures detected. Dispatching engineering swarm...".yellow()
    )?;

    let excerpt: String = log.chars().take(HEALING_LOG_LIMIT).collect();
    let directive = Directive::new(format!("FIX THIS ERROR: {}", excerpt))?;
    let result = client.submit_task(&directive).await?;

    writeln!(out, "{}", "✓ Patch proposed by agent swarm:".green())?;
    writeln!(
        out,
        "{}",
        result
            .summary
            .as_deref()
            .unwrap_or("(no patch summary returned)")
            .cyan()
    )?;
    writeln!(out, "{}", "Review the proposal and apply it manually.".yellow())?;
    Ok(())
}

/// Optionally prune, then rebuild and restart the compose stack
pub async fn rebuild<W: Write>(args: RebuildArgs, out: &mut W) -> Result<(), ConsoleError> {
    writeln!(out, "{}", "Initiating clean rebuild...".yellow())?;
    let compose_file = args.compose_file.to_string_lossy().into_owned();

    if args.prune {
        writeln!(out, "{}", "Pruning docker system...".red())?;
        run_inherited("docker prune", "docker", &["system", "prune", "-af", "--volumes"]).await?;
    }

    writeln!(out, "{}", "Building containers...".blue())?;
    run_inherited("docker-compose build", "docker-compose", &["-f", &compose_file, "build"]).await?;
    writeln!(out, "{}", "✓ Build complete. Restarting...".green())?;

    run_inherited("docker-compose up", "docker-compose", &["-f", &compose_file, "up", "-d"]).await?;
    writeln!(out, "{}", "✓ Containers restarted".green())?;
    Ok(())
}

// Child output goes straight to the terminal
async fn run_inherited(label: &str, program: &str, args: &[&str]) -> Result<(), ConsoleError> {
    info!("Running {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .status()
        .await
        .map_err(|e| ConsoleError::LocalToolFailure {
            tool: label.to_string(),
            code: None,
            output: e.to_string(),
        })?;

    if !status.success() {
        return Err(ConsoleError::LocalToolFailure {
            tool: label.to_string(),
            code: status.code(),
            output: "see output above".to_string(),
        });
    }
    Ok(())
}
