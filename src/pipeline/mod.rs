//! Transaction pipeline.
//!
//! # Data Flow
//! ```text
//! operations.rs (one call per command)
//!     → Pipeline::resolve_state   (account_info, NotFound → unopened placeholder)
//!     → Pipeline::drain_pending   (receivable snapshot → open/receive blocks, in order)
//!     → Pipeline::change_representative / send_funds (one block each)
//!          every block: build → sign → work_generate → process → next AccountInfo
//! ```
//!
//! # Constraints
//! - Strictly sequential: each block is built on the previous block's result
//! - The receivable list is fetched once per drain and never re-queried
//! - Applied blocks are final; a failure stops the run without undoing them,
//!   and re-running picks up whatever is still receivable
//! - Progress narration goes to the injected writer, results to the caller

pub mod confirm;
pub mod operations;

use std::fmt;
use std::io::Write;

use crate::amount::Raw;
use crate::error::AttoResult;
use crate::keys::{Account, PrivateKey};
use crate::ledger::{AccountInfo, AccountLookup, Block, BlockHash, Ledger};

pub use confirm::{Confirmation, PromptConfirmation, TerminalConfirmation};
pub use operations::{send, set_representative, settle_balance, show_address, Settings};

/// Drives blocks through a [`Ledger`] one at a time.
pub struct Pipeline<'a, L, W> {
    ledger: &'a L,
    /// Diagnostic stream for "... done" narration.
    progress: W,
    /// Raw digits per display unit, for narration only.
    amount_decimals: u32,
}

impl<'a, L: Ledger, W: Write> Pipeline<'a, L, W> {
    pub fn new(ledger: &'a L, progress: W, amount_decimals: u32) -> Self {
        Self {
            ledger,
            progress,
            amount_decimals,
        }
    }

    /// Current state of `account`, plus whether its next block must be an
    /// open block. A missing account is not an error.
    pub async fn resolve_state(&mut self, account: &Account) -> AttoResult<(AccountInfo, bool)> {
        match self.ledger.account_info(account).await? {
            AccountLookup::Found(info) => Ok((info, false)),
            AccountLookup::NotFound => Ok((AccountInfo::unopened(*account), true)),
        }
    }

    /// Receive every currently receivable transfer, in the order the ledger
    /// lists them.
    ///
    /// Returns the account state after the last received block. On error,
    /// blocks already published stay published.
    pub async fn drain_pending(
        &mut self,
        info: AccountInfo,
        first_receive: bool,
        key: &PrivateKey,
        default_representative: &Account,
    ) -> AttoResult<AccountInfo> {
        let pending = self.ledger.receivable(&info.account).await?;
        let mut info = info;
        let mut first_receive = first_receive;

        for transfer in &pending {
            self.narrate(format_args!(
                "Creating receive block for {} from {}... ",
                transfer.amount.to_display(self.amount_decimals),
                transfer.source
            ));
            let block = if first_receive {
                self.narrate(format_args!("opening account... "));
                first_receive = false;
                info.open_block(transfer, default_representative)?
            } else {
                info.receive_block(transfer)?
            };
            let next = info.apply(&block);
            self.publish(block, key).await?;
            info = next;
            self.narrate(format_args!("done\n"));
        }

        Ok(info)
    }

    /// Publish a single change block on top of `info`.
    pub async fn change_representative(
        &mut self,
        info: &AccountInfo,
        representative: &Account,
        key: &PrivateKey,
    ) -> AttoResult<AccountInfo> {
        self.narrate(format_args!("Creating change block... "));
        let block = info.change_block(representative)?;
        let next = info.apply(&block);
        self.publish(block, key).await?;
        self.narrate(format_args!("done\n"));
        Ok(next)
    }

    /// Publish a single send block on top of `info`.
    pub async fn send_funds(
        &mut self,
        info: &AccountInfo,
        amount: Raw,
        recipient: &Account,
        key: &PrivateKey,
    ) -> AttoResult<AccountInfo> {
        self.narrate(format_args!("Creating send block... "));
        let block = info.send_block(amount, recipient)?;
        let next = info.apply(&block);
        self.publish(block, key).await?;
        self.narrate(format_args!("done\n"));
        Ok(next)
    }

    /// Sign, fetch work for and submit one block.
    async fn publish(&mut self, block: Block, key: &PrivateKey) -> AttoResult<BlockHash> {
        let hash = block.hash();
        let kind = block.kind().as_str();
        let signed = block.sign(key)?;

        tracing::debug!(hash = %hash, kind, "Requesting work");
        let work = self.ledger.work_generate(&signed).await?;
        let sealed = signed.with_work(work);

        let accepted = self.ledger.process(&sealed).await?;
        if accepted != hash {
            tracing::warn!(expected = %hash, accepted = %accepted, "Node reported a different block hash");
        }
        tracing::info!(hash = %hash, kind, "Block published");
        Ok(hash)
    }

    /// Best effort: a broken diagnostic stream must not abort a half-done run.
    fn narrate(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.progress.write_fmt(args);
        let _ = self.progress.flush();
    }
}
