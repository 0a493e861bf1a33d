// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `r2r shell`: interactive console on stdin/stdout

use clap::Args;
use tokio::io::BufReader;

use crate::backend::BackendClient;
use crate::console::{Console, Session};
use crate::error::ConsoleError;

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Start with confirmations skipped
    #[arg(long)]
    pub yolo: bool,
}

pub async fn handle_command(args: ShellArgs, client: BackendClient) -> Result<(), ConsoleError> {
    let session = Session::new(client, args.yolo);
    let mut console = Console::new(session);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    console.run(stdin, &mut stdout).await
}
