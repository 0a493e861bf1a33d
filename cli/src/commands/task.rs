// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Directive submission

use clap::Args;
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::backend::{BackendClient, Directive, TaskResult};
use crate::error::ConsoleError;

#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Task description
    #[arg(value_name = "DESCRIPTION", required = true, num_args = 1..)]
    pub description: Vec<String>,

    /// Attach the contents of a file to the directive
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

pub async fn handle_command<W: Write>(
    args: TaskArgs,
    client: &BackendClient,
    out: &mut W,
) -> Result<(), ConsoleError> {
    let directive = build_directive(&args.description.join(" "), args.file.as_deref()).await?;
    submit(client, &directive, out).await
}

/// Validate the description and append the optional attachment
pub async fn build_directive(description: &str, file: Option<&Path>) -> Result<Directive, ConsoleError> {
    let directive = Directive::new(description)?;

    let Some(path) = file else {
        return Ok(directive);
    };
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        ConsoleError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(directive.attach(&name, &contents))
}

pub async fn submit<W: Write>(
    client: &BackendClient,
    directive: &Directive,
    out: &mut W,
) -> Result<(), ConsoleError> {
    writeln!(
        out,
        "{}",
        format!("Submitting task: \"{}\"", headline(directive)).blue()
    )?;

    let result = client.submit_task(directive).await?;
    render_result(&result, out)?;
    Ok(())
}

pub fn render_result<W: Write>(result: &TaskResult, out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("✓ Task accepted ({})", result.status).green()
    )?;
    writeln!(out, "{}", result.summary.as_deref().unwrap_or("Task complete."))?;
    for r in &result.results {
        writeln!(
            out,
            "{}",
            format!("- [{}]: {}", r.tool_id, r.output.as_deref().unwrap_or("Done")).dimmed()
        )?;
    }
    Ok(())
}

// First line of the directive, shortened for the echo
fn headline(directive: &Directive) -> String {
    let first = directive.as_str().lines().next().unwrap_or_default();
    if first.chars().count() > 80 {
        format!("{}...", first.chars().take(77).collect::<String>())
    } else {
        first.to_string()
    }
}
