//! atto: a minimal Nano wallet.
//!
//! # Architecture Overview
//!
//! ```text
//!   argv ──▶ cli (clap) ──▶ Invocation
//!                              │
//!   env / ATTO_CONFIG ──▶ config ──▶ Settings
//!                              │
//!   stdin (seed) ──────────────▼
//!                     pipeline::operations
//!                       │            │
//!                       ▼            ▼
//!                     keys        ledger::NodeClient ──▶ Nano node (JSON RPC)
//!                       │
//!   stdout ◀── address / balance / seed
//!   stderr ◀── progress narration, logs, errors
//! ```
//!
//! Exit codes: 0 success (or declined send), 1 usage error, 2 anything else.

use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use atto::cli::{execute, version_requested, Cli, Command, Invocation};
use atto::error::{AttoError, AttoResult, EXIT_USAGE};
use atto::keys::{AccountIndex, Seed};
use atto::observability::logging;
use atto::pipeline::{Settings, TerminalConfirmation};
use atto::{config, NodeClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if version_requested(&args) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    let result = match cli.into_invocation() {
        Ok(Invocation::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Run {
            command,
            account_index,
            forced,
        }) => run(command, account_index, forced).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AttoError::ConfirmationDeclined) => {
            eprintln!("{}", AttoError::ConfirmationDeclined);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(command: Command, account_index: AccountIndex, forced: bool) -> AttoResult<()> {
    // `new` needs neither configuration nor a seed.
    if command == Command::New {
        println!("{}", Seed::generate());
        return Ok(());
    }

    let config = config::load()?;
    logging::init(&config.observability);
    tracing::debug!(node = %config.node.rpc_url, account_index, "Configuration loaded");
    let settings = Settings::new(&config, account_index, forced)?;
    let seed = Seed::read_from(io::stdin().lock())?;
    let ledger = NodeClient::new(&config.node)?;

    execute(
        command,
        &ledger,
        &settings,
        &seed,
        &mut TerminalConfirmation,
        io::stdout(),
        io::stderr(),
    )
    .await
}
