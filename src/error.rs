//! Top-level error type and exit-code mapping.

use thiserror::Error;

use crate::amount::AmountParseError;
use crate::config::ConfigError;
use crate::keys::{Account, KeyError};
use crate::ledger::{BlockError, BlockHash, LedgerError};

/// Exit code for malformed command lines.
pub const EXIT_USAGE: u8 = 1;

/// Exit code for every failure after the command line was accepted.
pub const EXIT_OPERATIONAL: u8 = 2;

/// Everything that can stop a command.
#[derive(Debug, Error)]
pub enum AttoError {
    /// Malformed command line; reported before any network call.
    #[error("{0}")]
    Usage(String),

    /// Missing or malformed seed line.
    #[error(transparent)]
    Seed(KeyError),

    /// Node unreachable, non-success reply or malformed reply.
    #[error(transparent)]
    Transport(#[from] LedgerError),

    /// Malformed amount.
    #[error(transparent)]
    Amount(#[from] AmountParseError),

    /// Malformed destination or representative address.
    #[error(transparent)]
    Address(KeyError),

    /// A block could not be built from the current account state.
    #[error(transparent)]
    Block(BlockError),

    #[error("signing block {0} failed")]
    Signing(BlockHash),

    /// Change and send need an account that already has a chain.
    #[error("account {0} has not been opened yet; receive funds with the balance command first")]
    AccountNotOpened(Account),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not read confirmation: {0}")]
    Confirmation(std::io::Error),

    #[error("could not write output: {0}")]
    Output(std::io::Error),

    /// The user answered anything but yes to the send prompt.
    #[error("Send aborted.")]
    ConfirmationDeclined,
}

impl AttoError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AttoError::Usage(_) => EXIT_USAGE,
            AttoError::ConfirmationDeclined => 0,
            _ => EXIT_OPERATIONAL,
        }
    }
}

impl From<KeyError> for AttoError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::InvalidAddress(_) => AttoError::Address(err),
            KeyError::MissingSeed | KeyError::InvalidSeed(_) => AttoError::Seed(err),
        }
    }
}

impl From<BlockError> for AttoError {
    fn from(err: BlockError) -> Self {
        match err {
            BlockError::Signing(hash) => AttoError::Signing(hash),
            BlockError::NotOpened(account) => AttoError::AccountNotOpened(account),
            other => AttoError::Block(other),
        }
    }
}

/// Result type for command execution.
pub type AttoResult<T> = Result<T, AttoError>;
