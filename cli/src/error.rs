// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Console error taxonomy
//!
//! Every variant is handled where it occurs: the dispatcher (or the one-shot
//! subcommand wrapper) turns it into a single coloured status line.

use crate::backend::BackendError;

/// Errors surfaced by command handlers
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{tool} failed ({}): {output}", exit_label(.code))]
    LocalToolFailure {
        tool: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl ConsoleError {
    /// True when the backend never answered
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ConsoleError::Backend(BackendError::Unreachable { .. }))
    }
}
