//! The remote ledger as seen by the transaction pipeline.

use crate::keys::Account;
use crate::ledger::block::{SealedBlock, SignedBlock};
use crate::ledger::types::{AccountLookup, BlockHash, LedgerResult, PendingTransfer, Work};

/// Remote, authoritative ledger.
///
/// Each call either completes or fails; implementations must not retry on
/// their own. Calls are awaited one at a time by the pipeline.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Current state of `account`, or `NotFound` if it was never opened.
    async fn account_info(&self, account: &Account) -> LedgerResult<AccountLookup>;

    /// Transfers sent to `account` that it has not received yet, in the
    /// order the node reports them.
    async fn receivable(&self, account: &Account) -> LedgerResult<Vec<PendingTransfer>>;

    /// Proof-of-work for `block`. May take minutes.
    async fn work_generate(&self, block: &SignedBlock) -> LedgerResult<Work>;

    /// Publish `block`, returning the hash the node assigned to it.
    async fn process(&self, block: &SealedBlock) -> LedgerResult<BlockHash>;
}
