// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Backend health and diagnostics

use colored::Colorize;
use std::io::Write;

use crate::backend::{BackendClient, BackendError, Diagnostics, HealthReport, HealthStatus};
use crate::error::ConsoleError;

/// `r2r status`: health first, diagnostics only when the backend is up
pub async fn run<W: Write>(client: &BackendClient, out: &mut W) -> Result<(), ConsoleError> {
    writeln!(out, "{}", "Checking swarm status...".blue())?;

    match client.check_health().await {
        HealthStatus::Online(report) => {
            let diagnostics = client.fetch_diagnostics().await;
            render_online(&report, &diagnostics, out)?;
        }
        HealthStatus::Offline(err) => render_offline(client.base_url(), &err, out)?,
    }

    Ok(())
}

/// `diag`: diagnostics alone
pub async fn diagnostics<W: Write>(client: &BackendClient, out: &mut W) -> Result<(), ConsoleError> {
    let diagnostics = client.fetch_diagnostics().await;
    match diagnostics.db {
        Some(db) => writeln!(out, "  Database: {}", format_db(&db))?,
        None => writeln!(out, "{}", "ℹ No diagnostics available".yellow())?,
    }
    Ok(())
}

fn render_online<W: Write>(
    report: &HealthReport,
    diagnostics: &Diagnostics,
    out: &mut W,
) -> std::io::Result<()> {
    writeln!(out, "{}", "✓ Backend: ONLINE".green())?;
    writeln!(
        out,
        "  Version: {}",
        report.version.as_deref().unwrap_or("unknown").cyan()
    )?;
    let swarm = if report.swarm_active {
        "ACTIVE".green()
    } else {
        "RESTRICTED".yellow()
    };
    writeln!(out, "  Swarm: {}", swarm)?;
    writeln!(out, "  Agents: {}", report.agents.to_string().cyan())?;
    writeln!(out, "  RAG docs: {}", report.rag_docs.to_string().cyan())?;
    match &diagnostics.db {
        Some(db) => writeln!(out, "  Database: {}", format_db(db)),
        None => writeln!(out, "  Database: {}", "unknown".dimmed()),
    }
}

fn render_offline<W: Write>(target: &str, err: &BackendError, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", "✗ Backend: OFFLINE".red())?;
    writeln!(out, "  Target: {}", target.yellow())?;
    let reason = match err {
        BackendError::Unreachable { reason, .. } => reason.clone(),
        other => other.to_string(),
    };
    writeln!(out, "  Reason: {}", reason.dimmed())
}

fn format_db(db: &str) -> colored::ColoredString {
    match db.to_lowercase().as_str() {
        "ok" | "connected" | "healthy" => db.green(),
        "degraded" => db.yellow(),
        _ => db.red(),
    }
}
