//! The four user-facing operations.
//!
//! Each takes an explicit [`Settings`] value instead of reading flags or
//! environment during execution, and returns its machine-consumable result
//! to the caller; only narration is written along the way.

use std::io::Write;
use std::str::FromStr;

use crate::amount::Raw;
use crate::config::AttoConfig;
use crate::error::{AttoError, AttoResult};
use crate::keys::{derive_account, Account, AccountIndex, Seed};
use crate::ledger::{AccountInfo, BlockHash, Ledger};
use crate::pipeline::confirm::Confirmation;
use crate::pipeline::Pipeline;

/// Per-invocation settings, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub account_index: AccountIndex,
    /// Skip the send confirmation.
    pub forced: bool,
    pub default_representative: Account,
    pub amount_decimals: u32,
}

impl Settings {
    pub fn new(config: &AttoConfig, account_index: AccountIndex, forced: bool) -> AttoResult<Self> {
        Ok(Self {
            account_index,
            forced,
            default_representative: Account::from_str(&config.wallet.default_representative)?,
            amount_decimals: config.wallet.amount_decimals,
        })
    }
}

/// Address of the selected account. Touches no ledger.
pub fn show_address(settings: &Settings, seed: &Seed) -> Account {
    let (_, account) = derive_account(seed, settings.account_index);
    account
}

/// Receive everything receivable and return the resulting balance.
pub async fn settle_balance<L: Ledger, W: Write>(
    ledger: &L,
    settings: &Settings,
    seed: &Seed,
    progress: W,
) -> AttoResult<Raw> {
    let (key, account) = derive_account(seed, settings.account_index);
    let mut pipeline = Pipeline::new(ledger, progress, settings.amount_decimals);

    let (info, first_receive) = pipeline.resolve_state(&account).await?;
    let info = pipeline
        .drain_pending(info, first_receive, &key, &settings.default_representative)
        .await?;

    tracing::info!(account = %account, balance = %info.balance, "Balance settled");
    Ok(info.balance)
}

/// Change the representative of an opened account. Receivable funds are
/// left alone.
pub async fn set_representative<L: Ledger, W: Write>(
    ledger: &L,
    settings: &Settings,
    seed: &Seed,
    representative: &str,
    progress: W,
) -> AttoResult<BlockHash> {
    let representative = Account::from_str(representative)?;
    let (key, account) = derive_account(seed, settings.account_index);
    let mut pipeline = Pipeline::new(ledger, progress, settings.amount_decimals);

    let (info, first_receive) = pipeline.resolve_state(&account).await?;
    if first_receive {
        return Err(AttoError::AccountNotOpened(account));
    }
    let info = pipeline
        .change_representative(&info, &representative, &key)
        .await?;

    frontier_of(info, account)
}

/// Send `amount` display units to `recipient`.
///
/// Unless `settings.forced` is set, the parsed amount and recipient are
/// confirmed before the ledger is contacted at all.
pub async fn send<L: Ledger, C: Confirmation, W: Write>(
    ledger: &L,
    settings: &Settings,
    seed: &Seed,
    amount: &str,
    recipient: &str,
    confirm: &mut C,
    progress: W,
) -> AttoResult<BlockHash> {
    let (key, account) = derive_account(seed, settings.account_index);
    let amount = Raw::parse_display(amount, settings.amount_decimals)?;
    let recipient = Account::from_str(recipient)?;

    if !settings.forced {
        let prompt = format!(
            "Send {} to {}? [y/N]: ",
            amount.to_display(settings.amount_decimals),
            recipient
        );
        if !confirm.confirm(&prompt).map_err(AttoError::Confirmation)? {
            return Err(AttoError::ConfirmationDeclined);
        }
    }

    let mut pipeline = Pipeline::new(ledger, progress, settings.amount_decimals);
    let (info, first_receive) = pipeline.resolve_state(&account).await?;
    if first_receive {
        return Err(AttoError::AccountNotOpened(account));
    }
    let info = pipeline.send_funds(&info, amount, &recipient, &key).await?;

    frontier_of(info, account)
}

fn frontier_of(info: AccountInfo, account: Account) -> AttoResult<BlockHash> {
    info.frontier.ok_or(AttoError::AccountNotOpened(account))
}
