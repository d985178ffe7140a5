//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! AccountInfo (types.rs)
//!     → block.rs (build, hash, sign)
//!     → client.rs (Ledger trait: query, work, submit)
//!     → rpc.rs (JSON RPC over HTTP to a Nano node)
//! ```
//!
//! # Constraints
//! - Every call is complete-or-fail; nothing here retries
//! - Only sealed blocks (signed and with work) can be submitted
//! - Never log private keys or sensitive data

pub mod block;
pub mod client;
pub mod rpc;
pub mod types;

pub use block::{Block, BlockError, BlockKind, SealedBlock, SignedBlock};
pub use client::Ledger;
pub use rpc::NodeClient;
pub use types::{
    AccountInfo, AccountLookup, BlockHash, LedgerError, LedgerResult, PendingTransfer, Work,
};
