//! Minimal Nano wallet library.
//!
//! The binary is a thin shell around [`pipeline::operations`]; everything
//! that talks to the ledger goes through the [`ledger::Ledger`] trait.

pub mod amount;
pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod observability;
pub mod pipeline;

pub use amount::Raw;
pub use config::AttoConfig;
pub use error::{AttoError, AttoResult};
pub use ledger::{Ledger, NodeClient};
