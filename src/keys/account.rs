//! Public account identity and its `nano_` address form.

use std::fmt;
use std::str::FromStr;

use blake2::digest::consts::U5;
use blake2::{Blake2b, Digest};

use crate::keys::{KeyError, KeyResult};

/// Base32 alphabet used by Nano addresses (no 0, 2, l or v).
const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Preferred address prefix.
pub const ADDRESS_PREFIX: &str = "nano_";

/// Legacy prefix, still accepted when parsing.
pub const LEGACY_PREFIX: &str = "xrb_";

const KEY_CHARS: usize = 52;
const CHECKSUM_CHARS: usize = 8;

/// An account's public key, displayed as its address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Account([u8; 32]);

impl Account {
    pub fn from_public_key(public_key: [u8; 32]) -> Self {
        Self(public_key)
    }

    pub fn public_key(&self) -> &[u8; 32] {
        &self.0
    }

    fn checksum(&self) -> [u8; 5] {
        let digest = Blake2b::<U5>::digest(self.0);
        let mut checksum = [0u8; 5];
        checksum.copy_from_slice(&digest);
        checksum.reverse();
        checksum
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            ADDRESS_PREFIX,
            encode_base32(&self.0),
            encode_base32(&self.checksum())
        )
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self)
    }
}

impl FromStr for Account {
    type Err = KeyError;

    fn from_str(s: &str) -> KeyResult<Self> {
        let invalid = || KeyError::InvalidAddress(s.to_string());
        let body = s
            .strip_prefix(ADDRESS_PREFIX)
            .or_else(|| s.strip_prefix(LEGACY_PREFIX))
            .ok_or_else(invalid)?;
        if body.len() != KEY_CHARS + CHECKSUM_CHARS || !body.is_ascii() {
            return Err(invalid());
        }

        let (key_text, checksum_text) = body.split_at(KEY_CHARS);
        let mut public_key = [0u8; 32];
        decode_base32(key_text, &mut public_key).ok_or_else(invalid)?;
        let mut checksum = [0u8; 5];
        decode_base32(checksum_text, &mut checksum).ok_or_else(invalid)?;

        let account = Self(public_key);
        if account.checksum() != checksum {
            return Err(invalid());
        }
        Ok(account)
    }
}

/// Number of zero bits prepended so the bit length is a multiple of five.
fn padding_bits(len: usize) -> usize {
    (5 - (len * 8) % 5) % 5
}

fn encode_base32(bytes: &[u8]) -> String {
    let pad = padding_bits(bytes.len());
    let chars = (bytes.len() * 8 + pad) / 5;
    let bit = |i: usize| -> u8 {
        if i < pad {
            0
        } else {
            let j = i - pad;
            (bytes[j / 8] >> (7 - j % 8)) & 1
        }
    };

    (0..chars)
        .map(|c| {
            let value = (0..5).fold(0u8, |acc, k| (acc << 1) | bit(c * 5 + k));
            ALPHABET[value as usize] as char
        })
        .collect()
}

fn decode_base32(text: &str, out: &mut [u8]) -> Option<()> {
    let pad = padding_bits(out.len());
    if text.len() * 5 != out.len() * 8 + pad {
        return None;
    }
    out.fill(0);

    for (c, ch) in text.bytes().enumerate() {
        let value = ALPHABET.iter().position(|&a| a == ch)? as u8;
        for k in 0..5 {
            let i = c * 5 + k;
            let bit = (value >> (4 - k)) & 1;
            if i < pad {
                // Padding bits must be zero or the key would not fit.
                if bit != 0 {
                    return None;
                }
            } else {
                let j = i - pad;
                out[j / 8] |= bit << (7 - j % 8);
            }
        }
    }
    Some(())
}
