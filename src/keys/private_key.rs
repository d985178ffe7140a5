//! Private key derivation and block signing.
//!
//! Nano keys are Ed25519 keys whose internal hash is BLAKE2b-512 instead of
//! SHA-512, so signing goes through `ed25519_dalek`'s hazmat layer with an
//! explicit digest.

use std::fmt;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Blake2b512, Digest};
use ed25519_dalek::hazmat::{raw_sign, raw_verify, ExpandedSecretKey};
use ed25519_dalek::{Signature, VerifyingKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::keys::{Account, AccountIndex, Seed};

type Blake2b256 = Blake2b<U32>;

/// Secret key of a single derived account.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// BLAKE2b-256 over the seed followed by the big-endian index.
    pub fn derive(seed: &Seed, index: AccountIndex) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(seed.as_bytes());
        hasher.update(index.to_be_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&hasher.finalize());
        Self(key)
    }

    fn expanded(&self) -> ExpandedSecretKey {
        let digest = Blake2b512::digest(self.0);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&digest);
        let expanded = ExpandedSecretKey::from_bytes(&bytes);
        bytes.zeroize();
        expanded
    }

    fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from(&self.expanded())
    }

    /// Public account belonging to this key.
    pub fn account(&self) -> Account {
        Account::from_public_key(self.verifying_key().to_bytes())
    }

    /// Sign `message` (a block hash) with Ed25519-BLAKE2b.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let expanded = self.expanded();
        let verifying_key = VerifyingKey::from(&expanded);
        raw_sign::<Blake2b512>(&expanded, message, &verifying_key)
    }
}

/// Check an Ed25519-BLAKE2b signature made by `account`.
pub fn verify(account: &Account, message: &[u8], signature: &Signature) -> bool {
    match VerifyingKey::from_bytes(account.public_key()) {
        Ok(key) => raw_verify::<Blake2b512>(&key, message, signature).is_ok(),
        Err(_) => false,
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}
