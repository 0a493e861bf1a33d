// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! r2r console library - exposes testable components
//!
//! # Architecture
//!
//! - **backend:** HTTP and WebSocket access to the swarm backend
//! - **console:** interactive command loop and its session state
//! - **commands:** handlers shared by subcommands and the shell

pub mod backend;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;

pub use error::ConsoleError;
