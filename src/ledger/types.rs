//! Ledger types and error definitions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::amount::Raw;
use crate::keys::Account;

/// Reference to a block: its 32-byte BLAKE2b hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self)
    }
}

impl FromStr for BlockHash {
    type Err = LedgerError;

    fn from_str(s: &str) -> LedgerResult<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| LedgerError::Malformed(format!("invalid block hash '{}': {}", s, e)))?;
        Ok(Self(bytes))
    }
}

/// Proof-of-work nonce for one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Work(pub u64);

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Work {
    type Err = LedgerError;

    fn from_str(s: &str) -> LedgerResult<Self> {
        if s.is_empty() || s.len() > 16 {
            return Err(LedgerError::Malformed(format!("invalid work '{}'", s)));
        }
        u64::from_str_radix(s, 16)
            .map(Work)
            .map_err(|e| LedgerError::Malformed(format!("invalid work '{}': {}", s, e)))
    }
}

/// Snapshot of an account's chain as the ledger last reported it.
///
/// An unopened account has no frontier and no representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account: Account,
    pub balance: Raw,
    pub frontier: Option<BlockHash>,
    pub representative: Option<Account>,
}

impl AccountInfo {
    /// Zero-balance placeholder for an account the ledger has never seen.
    pub fn unopened(account: Account) -> Self {
        Self {
            account,
            balance: Raw::ZERO,
            frontier: None,
            representative: None,
        }
    }

    pub fn is_opened(&self) -> bool {
        self.frontier.is_some()
    }
}

/// Result of looking an account up on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Found(AccountInfo),
    NotFound,
}

/// Funds sent to an account that it has not yet received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransfer {
    /// Hash of the send block on the sender's chain.
    pub hash: BlockHash,
    pub source: Account,
    pub amount: Raw,
}

/// Errors talking to the ledger node.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The node could not be reached or the connection failed mid-request.
    #[error("could not reach node: {0}")]
    Unreachable(String),

    /// The node answered with a non-success HTTP status.
    #[error("node returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The node rejected the request.
    #[error("node error: {0}")]
    Node(String),

    /// The reply could not be interpreted.
    #[error("malformed reply from node: {0}")]
    Malformed(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
