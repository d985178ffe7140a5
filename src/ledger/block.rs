//! State block construction, hashing and signing.
//!
//! # Lifecycle
//! ```text
//! AccountInfo::{open,receive,change,send}_block → Block (unsigned)
//!     → Block::sign           → SignedBlock
//!     → SignedBlock::with_work → SealedBlock (the only submittable form)
//! ```
//!
//! Every block is a Nano "state" block; the subtype only decides how the
//! link field and the balance are filled in and which work threshold the
//! network expects.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::Signature;
use serde_json::{json, Value};
use thiserror::Error;

use crate::amount::Raw;
use crate::keys::private_key::verify;
use crate::keys::{Account, PrivateKey};
use crate::ledger::types::{AccountInfo, BlockHash, PendingTransfer, Work};

type Blake2b256 = Blake2b<U32>;

/// Hash preamble identifying state blocks: 31 zero bytes then 0x06.
const STATE_BLOCK_PREAMBLE: [u8; 32] = {
    let mut preamble = [0u8; 32];
    preamble[31] = 6;
    preamble
};

/// Minimum work difficulty for open and receive blocks.
pub const RECEIVE_WORK_THRESHOLD: u64 = 0xfffffe0000000000;

/// Minimum work difficulty for send and change blocks.
pub const SEND_WORK_THRESHOLD: u64 = 0xfffffff800000000;

/// Errors building or signing a block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockError {
    #[error("account {0} has not been opened yet")]
    NotOpened(Account),

    #[error("account {0} is already open")]
    AlreadyOpened(Account),

    #[error("insufficient funds: balance is {balance} raw, tried to send {amount} raw")]
    InsufficientFunds { balance: Raw, amount: Raw },

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("receiving {0} raw would overflow the balance")]
    BalanceOverflow(Raw),

    #[error("signature for block {0} did not verify")]
    Signing(BlockHash),
}

/// Block subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Open,
    Receive,
    Send,
    Change,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Open => "open",
            BlockKind::Receive => "receive",
            BlockKind::Send => "send",
            BlockKind::Change => "change",
        }
    }

    pub fn work_threshold(&self) -> u64 {
        match self {
            BlockKind::Open | BlockKind::Receive => RECEIVE_WORK_THRESHOLD,
            BlockKind::Send | BlockKind::Change => SEND_WORK_THRESHOLD,
        }
    }
}

/// An unsigned state block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    account: Account,
    /// `None` only for open blocks.
    previous: Option<BlockHash>,
    representative: Account,
    balance: Raw,
    link: [u8; 32],
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn previous(&self) -> Option<BlockHash> {
        self.previous
    }

    pub fn representative(&self) -> &Account {
        &self.representative
    }

    /// Account balance after this block is applied.
    pub fn balance(&self) -> Raw {
        self.balance
    }

    pub fn link(&self) -> &[u8; 32] {
        &self.link
    }

    pub fn hash(&self) -> BlockHash {
        let mut hasher = Blake2b256::new();
        hasher.update(STATE_BLOCK_PREAMBLE);
        hasher.update(self.account.public_key());
        hasher.update(self.previous.map(|p| p.0).unwrap_or([0u8; 32]));
        hasher.update(self.representative.public_key());
        hasher.update(self.balance.to_be_bytes());
        hasher.update(self.link);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&hasher.finalize());
        BlockHash(hash)
    }

    /// Value the proof-of-work is computed over: the previous block, or the
    /// account's public key for the first block of a chain.
    pub fn work_root(&self) -> [u8; 32] {
        match self.previous {
            Some(previous) => previous.0,
            None => *self.account.public_key(),
        }
    }

    /// Sign the block hash, then check the signature before handing it out.
    pub fn sign(self, key: &PrivateKey) -> Result<SignedBlock, BlockError> {
        let hash = self.hash();
        let signature = key.sign(hash.as_bytes());
        if !verify(&self.account, hash.as_bytes(), &signature) {
            return Err(BlockError::Signing(hash));
        }
        Ok(SignedBlock {
            block: self,
            signature,
        })
    }
}

/// A signed block still waiting for proof-of-work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBlock {
    block: Block,
    signature: Signature,
}

impl SignedBlock {
    pub fn block(&self) -> &Block {
        &self.block
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn with_work(self, work: Work) -> SealedBlock {
        SealedBlock {
            block: self.block,
            signature: self.signature,
            work,
        }
    }
}

/// A block carrying both signature and work, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlock {
    block: Block,
    signature: Signature,
    work: Work,
}

impl SealedBlock {
    pub fn block(&self) -> &Block {
        &self.block
    }

    /// JSON form accepted by the node's `process` action.
    pub fn to_json(&self) -> Value {
        let block = &self.block;
        json!({
            "type": "state",
            "account": block.account.to_string(),
            "previous": hex::encode_upper(block.previous.map(|p| p.0).unwrap_or([0u8; 32])),
            "representative": block.representative.to_string(),
            "balance": block.balance.to_string(),
            "link": hex::encode_upper(block.link),
            "signature": hex::encode_upper(self.signature.to_bytes()),
            "work": self.work.to_string(),
        })
    }
}

impl AccountInfo {
    /// First block of a never-opened account, receiving `pending`.
    pub fn open_block(
        &self,
        pending: &PendingTransfer,
        representative: &Account,
    ) -> Result<Block, BlockError> {
        if self.is_opened() {
            return Err(BlockError::AlreadyOpened(self.account));
        }
        Ok(Block {
            kind: BlockKind::Open,
            account: self.account,
            previous: None,
            representative: *representative,
            balance: pending.amount,
            link: pending.hash.0,
        })
    }

    /// Receive `pending` on top of the current frontier.
    pub fn receive_block(&self, pending: &PendingTransfer) -> Result<Block, BlockError> {
        let (previous, representative) = self.chain_head()?;
        let balance = self
            .balance
            .checked_add(pending.amount)
            .ok_or(BlockError::BalanceOverflow(pending.amount))?;
        Ok(Block {
            kind: BlockKind::Receive,
            account: self.account,
            previous: Some(previous),
            representative,
            balance,
            link: pending.hash.0,
        })
    }

    /// Point the account at a new representative, balance unchanged.
    pub fn change_block(&self, representative: &Account) -> Result<Block, BlockError> {
        let (previous, _) = self.chain_head()?;
        Ok(Block {
            kind: BlockKind::Change,
            account: self.account,
            previous: Some(previous),
            representative: *representative,
            balance: self.balance,
            link: [0u8; 32],
        })
    }

    /// Send `amount` raw to `destination`.
    pub fn send_block(&self, amount: Raw, destination: &Account) -> Result<Block, BlockError> {
        let (previous, representative) = self.chain_head()?;
        if amount == Raw::ZERO {
            return Err(BlockError::ZeroAmount);
        }
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or(BlockError::InsufficientFunds {
                balance: self.balance,
                amount,
            })?;
        Ok(Block {
            kind: BlockKind::Send,
            account: self.account,
            previous: Some(previous),
            representative,
            balance,
            link: *destination.public_key(),
        })
    }

    /// State of the account once `block` has been applied.
    pub fn apply(&self, block: &Block) -> AccountInfo {
        AccountInfo {
            account: self.account,
            balance: block.balance,
            frontier: Some(block.hash()),
            representative: Some(block.representative),
        }
    }

    fn chain_head(&self) -> Result<(BlockHash, Account), BlockError> {
        match (self.frontier, self.representative) {
            (Some(frontier), Some(representative)) => Ok((frontier, representative)),
            _ => Err(BlockError::NotOpened(self.account)),
        }
    }
}
