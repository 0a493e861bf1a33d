// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Swarm backend access
//!
//! Handles:
//! - Authenticated HTTP calls (health, diagnostics, tasks, launch)
//! - The WebSocket push stream (voice / chamber)
//! - Normalising transport and status failures into [`BackendError`]

pub mod client;
pub mod stream;
pub mod types;

pub use client::{BackendClient, HealthStatus};
pub use stream::{EventStream, StreamChannel, StreamEvent};
pub use types::{Diagnostics, Directive, HealthReport, TaskResult, ToolOutput};

/// Failures talking to the backend
///
/// `Unreachable` means no response arrived at all; `Rejected` means the
/// backend answered with an error status. Callers pick display text from the
/// variant alone.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("{}", rejected_message(.status, .detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

fn rejected_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("backend returned HTTP {}", status),
    }
}
