// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive console
//!
//! Reads one line at a time, dispatches it to a handler and re-prompts.
//! Handler failures are printed at the dispatch boundary and never end the
//! loop; only `exit`/`quit` (or end of input) does. While a push stream is
//! open, its events are printed as they arrive between commands.

use colored::Colorize;
use std::io::{ErrorKind, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use crate::backend::{Directive, StreamChannel};
use crate::commands::{launch, report_failure, status, task};
use crate::error::ConsoleError;

pub mod command;
pub mod session;

pub use command::{split_line, ShellCommand};
pub use session::{Session, Speaker, StreamUpdate, TranscriptEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    Prompting,
    Handling(ShellCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Console {
    session: Session,
    state: ConsoleState,
}

impl Console {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: ConsoleState::Prompting,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    /// Run until `exit`/`quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(
            out,
            "{} {}",
            "r2r console".bold(),
            format!("(backend: {})", self.session.client().base_url()).dimmed()
        )?;
        writeln!(out, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        loop {
            self.prompt(out)?;

            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if self.handle_line(&line, &mut lines, out).await? == Flow::Exit {
                                break;
                            }
                        }
                        Ok(None) => {
                            writeln!(out)?;
                            break;
                        }
                        // The offending bytes are already consumed
                        Err(e) if e.kind() == ErrorKind::InvalidData => {
                            writeln!(out, "{}", "✗ Invalid input: line is not valid UTF-8".red())?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                update = self.session.next_stream_update() => self.show_stream_update(update, out)?,
            }
        }

        self.session.close_stream().await;
        Ok(())
    }

    /// Dispatch one raw line. Only terminal I/O errors escape.
    pub async fn handle_line<R, W>(
        &mut self,
        line: &str,
        input: &mut Lines<R>,
        out: &mut W,
    ) -> Result<Flow, ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let Some((token, payload)) = split_line(line) else {
            return Ok(Flow::Continue);
        };
        let Some(command) = ShellCommand::lookup(token) else {
            writeln!(
                out,
                "{}",
                format!("Unknown command: {} (type 'help' for a list)", token).yellow()
            )?;
            return Ok(Flow::Continue);
        };

        debug!("Handling {:?}", command);
        self.state = ConsoleState::Handling(command);
        let outcome = self.execute(command, payload, input, out).await;
        self.state = ConsoleState::Prompting;

        match outcome {
            Ok(flow) => Ok(flow),
            Err(ConsoleError::Io(e)) => Err(ConsoleError::Io(e)),
            Err(e) => {
                report_failure(out, command.failure_label(), &e)?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn execute<R, W>(
        &mut self,
        command: ShellCommand,
        payload: &str,
        input: &mut Lines<R>,
        out: &mut W,
    ) -> Result<Flow, ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        match command {
            ShellCommand::Help => self.help(out)?,
            ShellCommand::Clear => {
                write!(out, "\x1B[2J\x1B[1;1H")?;
            }
            ShellCommand::Status => status::run(self.session.client(), out).await?,
            ShellCommand::Diagnostics => status::diagnostics(self.session.client(), out).await?,
            ShellCommand::Task => {
                let directive = Directive::new(payload)?;
                if self.confirm("Submit directive?", input, out).await? {
                    task::submit(self.session.client(), &directive, out).await?;
                } else {
                    writeln!(out, "{}", "Cancelled.".yellow())?;
                }
            }
            ShellCommand::Launch => launch::run(self.session.client(), payload, out).await?,
            ShellCommand::Yolo => {
                if self.session.toggle_skip_confirmations() {
                    writeln!(out, "{}", "⚠ YOLO mode ON: confirmations skipped".yellow().bold())?;
                } else {
                    writeln!(out, "{}", "YOLO mode OFF".green())?;
                }
            }
            ShellCommand::Voice => self.toggle_stream(StreamChannel::Voice, out).await?,
            ShellCommand::Chamber => self.toggle_stream(StreamChannel::Chamber, out).await?,
            ShellCommand::Exit => {
                if let Some(channel) = self.session.close_stream().await {
                    writeln!(out, "{} stream closed", channel)?;
                }
                writeln!(out, "{}", "Goodbye.".dimmed())?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn prompt<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.session.skip_confirmations() {
            write!(out, "{} ", "r2r[yolo]>".red().bold())?;
        } else {
            write!(out, "{} ", "r2r>".cyan().bold())?;
        }
        out.flush()
    }

    fn help<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", "Available commands:".bold())?;
        for command in ShellCommand::all() {
            writeln!(
                out,
                "  {:<20} {}",
                command.usage().cyan(),
                command.description().dimmed()
            )?;
        }
        Ok(())
    }

    /// Ask a yes/no question on the console input; yolo mode answers yes
    async fn confirm<R, W>(
        &self,
        question: &str,
        input: &mut Lines<R>,
        out: &mut W,
    ) -> Result<bool, ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.session.skip_confirmations() {
            return Ok(true);
        }

        write!(out, "{} ", format!("{} (y/N)", question).yellow())?;
        out.flush()?;

        let answer = match input.next_line().await {
            Ok(answer) => answer.unwrap_or_default(),
            Err(e) if e.kind() == ErrorKind::InvalidData => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    async fn toggle_stream<W: Write>(
        &mut self,
        channel: StreamChannel,
        out: &mut W,
    ) -> Result<(), ConsoleError> {
        if let Some(open) = self.session.close_stream().await {
            writeln!(out, "{}", format!("{} stream closed", open).yellow())?;
            if open == channel {
                return Ok(());
            }
        }

        writeln!(out, "{}", format!("Connecting to {} stream...", channel).blue())?;
        let stream = self.session.client().open_stream(channel).await?;
        self.session.attach_stream(stream).await;
        writeln!(out, "{}", format!("✓ {} stream connected", channel).green())?;
        Ok(())
    }

    fn show_stream_update<W: Write>(&mut self, update: StreamUpdate, out: &mut W) -> std::io::Result<()> {
        // Start over the pending prompt
        write!(out, "\r")?;
        match update {
            StreamUpdate::Event(event) => {
                if let Some(entry) = self.session.record(event) {
                    writeln!(out, "{}", format_entry(entry))?;
                }
            }
            StreamUpdate::Closed(channel) => {
                writeln!(out, "{}", format!("{} stream closed by backend", channel).yellow())?;
            }
            StreamUpdate::Failed(channel, e) => {
                writeln!(out, "{}", format!("✗ {} stream failed: {}", channel, e).red())?;
            }
        }
        Ok(())
    }
}

pub fn format_entry(entry: &TranscriptEntry) -> String {
    match entry.speaker {
        Speaker::User => format!("{} {}", "you:".bold(), entry.text),
        Speaker::Agent => format!("{} {}", "swarm:".green().bold(), entry.text.green()),
        Speaker::System => format!("{} {}", "control:".magenta(), entry.text.dimmed()),
    }
}
