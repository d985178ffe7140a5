//! Wallet seed handling.
//!
//! # Security
//! - The seed is read once from standard input and never persisted
//! - `Debug` output is redacted; only `Display` reveals the hex form,
//!   which the `new` command prints on purpose

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keys::{KeyError, KeyResult};

/// Length of a seed in bytes.
pub const SEED_LEN: usize = 32;

/// 256-bit root secret from which all accounts are derived.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Generate a fresh seed from the operating system's entropy source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    /// Read the seed from the first line of `input`.
    ///
    /// Surrounding whitespace is ignored; anything after the first line is
    /// left unread.
    pub fn read_from<R: BufRead>(mut input: R) -> KeyResult<Self> {
        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| KeyError::InvalidSeed(format!("could not read input: {}", e)))?;
        let trimmed = line.trim();
        if read == 0 || trimmed.is_empty() {
            line.zeroize();
            return Err(KeyError::MissingSeed);
        }
        let seed = trimmed.parse();
        line.zeroize();
        seed
    }
}

impl FromStr for Seed {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != SEED_LEN * 2 {
            return Err(KeyError::InvalidSeed(format!(
                "expected {} hexadecimal characters, got {}",
                SEED_LEN * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; SEED_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| KeyError::InvalidSeed("not a hexadecimal string".to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}
