// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Swarm activation

use clap::Args;
use colored::Colorize;
use std::io::Write;

use crate::backend::BackendClient;
use crate::error::ConsoleError;

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Activation signature issued with the license
    #[arg(long, env = "R2R_LAUNCH_SIGNATURE", value_name = "SIGNATURE")]
    pub signature: String,
}

pub async fn handle_command<W: Write>(
    args: LaunchArgs,
    client: &BackendClient,
    out: &mut W,
) -> Result<(), ConsoleError> {
    run(client, &args.signature, out).await
}

pub async fn run<W: Write>(
    client: &BackendClient,
    signature: &str,
    out: &mut W,
) -> Result<(), ConsoleError> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(ConsoleError::InvalidInput(
            "an activation signature is required".to_string(),
        ));
    }

    writeln!(out, "{}", "Initiating ignition sequence...".yellow())?;
    let response = client.launch(signature).await?;

    writeln!(out, "{}", "✓ Swarm activated".green().bold())?;
    if let Some(message) = response
        .get("message")
        .or_else(|| response.get("status"))
        .and_then(|v| v.as_str())
    {
        writeln!(out, "  {}", message)?;
    }
    Ok(())
}
