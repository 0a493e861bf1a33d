// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the r2r console
//!
//! Each handler writes to a caller-supplied writer so the one-shot
//! subcommands and the interactive shell share the same output.

use colored::Colorize;
use std::io::Write;

use crate::error::ConsoleError;

pub mod dev;
pub mod launch;
pub mod shell;
pub mod status;
pub mod task;

pub use self::dev::{AutofixArgs, RebuildArgs};
pub use self::launch::LaunchArgs;
pub use self::shell::ShellArgs;
pub use self::task::TaskArgs;

/// Print a handled failure as one red line, plus a hint when the backend never answered
pub fn report_failure<W: Write>(out: &mut W, label: &str, err: &ConsoleError) -> std::io::Result<()> {
    writeln!(out, "{}", format!("✗ {}: {}", label, err).red())?;
    if err.is_unreachable() {
        writeln!(
            out,
            "{}",
            "  Is the backend running? Check --backend-url or R2R_BACKEND_URL.".dimmed()
        )?;
    }
    Ok(())
}
