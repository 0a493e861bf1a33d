// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shell command table and line splitting

/// Commands understood by the interactive shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Clear,
    Status,
    Diagnostics,
    Task,
    Launch,
    Yolo,
    Voice,
    Chamber,
    Exit,
}

const COMMANDS: &[(&str, ShellCommand)] = &[
    ("help", ShellCommand::Help),
    ("clear", ShellCommand::Clear),
    ("status", ShellCommand::Status),
    ("diag", ShellCommand::Diagnostics),
    ("task", ShellCommand::Task),
    ("launch", ShellCommand::Launch),
    ("yolo", ShellCommand::Yolo),
    ("voice", ShellCommand::Voice),
    ("chamber", ShellCommand::Chamber),
    ("exit", ShellCommand::Exit),
    ("quit", ShellCommand::Exit),
];

impl ShellCommand {
    /// Case-insensitive lookup of a command token
    pub fn lookup(token: &str) -> Option<Self> {
        let token = token.to_lowercase();
        COMMANDS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, command)| *command)
    }

    pub fn usage(self) -> &'static str {
        match self {
            ShellCommand::Help => "help",
            ShellCommand::Clear => "clear",
            ShellCommand::Status => "status",
            ShellCommand::Diagnostics => "diag",
            ShellCommand::Task => "task <directive>",
            ShellCommand::Launch => "launch <signature>",
            ShellCommand::Yolo => "yolo",
            ShellCommand::Voice => "voice",
            ShellCommand::Chamber => "chamber",
            ShellCommand::Exit => "exit/quit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ShellCommand::Help => "Show this help message",
            ShellCommand::Clear => "Clear the screen",
            ShellCommand::Status => "Check backend health and swarm state",
            ShellCommand::Diagnostics => "Show backend diagnostics",
            ShellCommand::Task => "Submit a directive to the swarm",
            ShellCommand::Launch => "Activate the swarm",
            ShellCommand::Yolo => "Toggle skipping confirmations",
            ShellCommand::Voice => "Toggle the voice stream",
            ShellCommand::Chamber => "Toggle the chamber log stream",
            ShellCommand::Exit => "Exit the console",
        }
    }

    /// Prefix of the error line printed when the handler fails
    pub fn failure_label(self) -> &'static str {
        match self {
            ShellCommand::Status | ShellCommand::Diagnostics => "Status check failed",
            ShellCommand::Task => "Task failed",
            ShellCommand::Launch => "Activation failed",
            ShellCommand::Voice | ShellCommand::Chamber => "Stream failed",
            _ => "Command failed",
        }
    }

    /// Commands in help order, aliases folded
    pub fn all() -> impl Iterator<Item = ShellCommand> {
        COMMANDS
            .iter()
            .filter(|(name, _)| *name != "quit")
            .map(|(_, command)| *command)
    }
}

/// Split a line into command token and payload. `None` for blank lines.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((command, payload)) => Some((command, payload.trim())),
        None => Some((line, "")),
    }
}
