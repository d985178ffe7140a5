//! Seed and key management.
//!
//! # Data Flow
//! ```text
//! Seed (stdin, hex)  +  AccountIndex (-a flag)
//!     → private_key.rs (BLAKE2b-256 derivation, Ed25519-BLAKE2b signing)
//!     → account.rs (public key, nano_ address encoding)
//! ```
//!
//! # Security Constraints
//! - Seeds and private keys are zeroized on drop
//! - Neither type prints its secret through `Debug`
//! - Nothing here is ever written to disk or logged

pub mod account;
pub mod private_key;
pub mod seed;

use thiserror::Error;

pub use account::Account;
pub use private_key::PrivateKey;
pub use seed::Seed;

/// Selects one of the 2^32 accounts derivable from a seed.
pub type AccountIndex = u32;

/// Errors raised while handling seeds, keys and addresses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// No seed line was available.
    #[error("could not read seed from standard input")]
    MissingSeed,

    /// The seed line is not 64 hexadecimal characters.
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    /// Address text failed prefix, length, alphabet or checksum checks.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
}

pub type KeyResult<T> = Result<T, KeyError>;

/// Derive the private key and public account for `index` under `seed`.
///
/// Every 32-byte seed and every `u32` index is valid, so this cannot fail;
/// malformed seeds and out-of-range indices are rejected while parsing.
pub fn derive_account(seed: &Seed, index: AccountIndex) -> (PrivateKey, Account) {
    let private_key = PrivateKey::derive(seed, index);
    let account = private_key.account();
    tracing::debug!(index, account = %account, "Derived account");
    (private_key, account)
}
