//! Command-line surface.

use std::io::Write;

use clap::{Parser, Subcommand};

use crate::error::{AttoError, AttoResult};
use crate::keys::{AccountIndex, Seed};
use crate::ledger::Ledger;
use crate::pipeline::{
    send, set_representative, settle_balance, show_address, Confirmation, Settings,
};

#[derive(Debug, Parser)]
#[command(name = "atto")]
#[command(about = "Minimal Nano wallet: show addresses, receive, change representative, send")]
#[command(
    long_about = "The address, balance, representative and send subcommands expect a seed \
                  as the first line of their standard input, e.g.:\n\n    \
                  atto new | tee seed.txt | atto address\n\n\
                  The send subcommand asks for confirmation on the terminal unless -y is given."
)]
#[command(disable_version_flag = true, infer_subcommands = true)]
pub struct Cli {
    /// Account to use; one seed derives accounts 0 to 4,294,967,295
    #[arg(short = 'a', value_name = "ACCOUNT_INDEX", default_value_t = 0, global = true)]
    pub account_index: AccountIndex,

    /// Send without asking for confirmation
    #[arg(short = 'y', global = true)]
    pub yes: bool,

    /// Print the version number and exit
    #[arg(short = 'v')]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Generate a new seed
    #[command(visible_alias = "n")]
    New,
    /// Show the address of an account
    #[command(visible_alias = "a")]
    Address,
    /// Receive pending funds and show the balance
    #[command(visible_alias = "b")]
    Balance,
    /// Change the account's representative
    #[command(visible_alias = "r")]
    Representative {
        #[arg(value_name = "REPRESENTATIVE")]
        representative: String,
    },
    /// Send funds to an address
    #[command(visible_alias = "s")]
    Send {
        #[arg(value_name = "AMOUNT")]
        amount: String,
        #[arg(value_name = "RECEIVER")]
        receiver: String,
    },
}

/// What `main` should do once the command line is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Version,
    Run {
        command: Command,
        account_index: AccountIndex,
        forced: bool,
    },
}

/// Whether `-v` appears among the leading flags of `args` (program name
/// first). Only the flags before the subcommand are looked at, and nothing
/// after `-v` is validated.
pub fn version_requested<S: AsRef<str>>(args: &[S]) -> bool {
    let mut flags = args.iter().skip(1).map(AsRef::as_ref);
    while let Some(arg) = flags.next() {
        match arg {
            "-v" => return true,
            "--" => return false,
            "-a" => {
                flags.next();
            }
            flag if flag.starts_with('-') => {}
            _ => return false,
        }
    }
    false
}

/// Run one accepted command, writing its result to `out` and narration to
/// `progress`.
pub async fn execute<L, C, O, P>(
    command: Command,
    ledger: &L,
    settings: &Settings,
    seed: &Seed,
    confirm: &mut C,
    mut out: O,
    progress: P,
) -> AttoResult<()>
where
    L: Ledger,
    C: Confirmation,
    O: Write,
    P: Write,
{
    let written = match command {
        Command::New => writeln!(out, "{}", Seed::generate()),
        Command::Address => writeln!(out, "{}", show_address(settings, seed)),
        Command::Balance => {
            let balance = settle_balance(ledger, settings, seed, progress).await?;
            writeln!(out, "{}", balance.to_display(settings.amount_decimals))
        }
        Command::Representative { representative } => {
            set_representative(ledger, settings, seed, &representative, progress).await?;
            Ok(())
        }
        Command::Send { amount, receiver } => {
            send(ledger, settings, seed, &amount, &receiver, confirm, progress).await?;
            Ok(())
        }
    };
    written.map_err(AttoError::Output)
}

impl Cli {
    /// Otherwise a subcommand is required.
    pub fn into_invocation(self) -> Result<Invocation, AttoError> {
        if self.version {
            return Ok(Invocation::Version);
        }
        match self.command {
            Some(command) => Ok(Invocation::Run {
                command,
                account_index: self.account_index,
                forced: self.yes,
            }),
            None => Err(AttoError::Usage("a subcommand is required; see --help".to_string())),
        }
    }
}
