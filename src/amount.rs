//! Ledger amounts.
//!
//! All arithmetic happens on [`Raw`], the smallest indivisible unit.
//! Decimal text only exists at the presentation boundary: command-line
//! input is parsed into `Raw` before anything else touches it, and a
//! `Raw` is only turned back into decimal text for printing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest supported number of decimal places; `10^38` still fits a `u128`.
pub const MAX_DECIMALS: u32 = 38;

/// Errors produced while turning text into an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("cannot parse '{0}' as an amount")]
    InvalidCharacter(String),

    #[error("amount '{text}' has more than {decimals} decimal places")]
    TooPrecise { text: String, decimals: u32 },

    #[error("amount '{0}' is too large")]
    Overflow(String),
}

/// An amount in raw units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Raw(pub u128);

impl Raw {
    pub const ZERO: Raw = Raw(0);

    pub fn checked_add(self, other: Raw) -> Option<Raw> {
        self.0.checked_add(other.0).map(Raw)
    }

    pub fn checked_sub(self, other: Raw) -> Option<Raw> {
        self.0.checked_sub(other.0).map(Raw)
    }

    /// Big-endian 16-byte encoding used inside block hashes.
    pub fn to_be_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Render as a decimal number of display units.
    ///
    /// Trailing zeros of the fraction are dropped, and so is the decimal
    /// point when the fraction is zero (`1125 * 10^24` with 27 decimals
    /// renders as `1.125`).
    pub fn to_display(self, decimals: u32) -> String {
        let scale = scale(decimals);
        let whole = self.0 / scale;
        let fraction = self.0 % scale;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:0width$}", fraction, width = decimals as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }

    /// Parse a decimal number of display units into raw units.
    pub fn parse_display(text: &str, decimals: u32) -> Result<Raw, AmountParseError> {
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountParseError::Empty);
        }
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) {
            return Err(AmountParseError::InvalidCharacter(text.to_string()));
        }
        if fraction.len() > decimals as usize {
            return Err(AmountParseError::TooPrecise {
                text: text.to_string(),
                decimals,
            });
        }

        let overflow = || AmountParseError::Overflow(text.to_string());
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let fraction: u128 = if fraction.is_empty() {
            0
        } else {
            let padding = decimals - fraction.len() as u32;
            let digits: u128 = fraction.parse().map_err(|_| overflow())?;
            digits * scale(padding)
        };

        whole
            .checked_mul(scale(decimals))
            .and_then(|v| v.checked_add(fraction))
            .map(Raw)
            .ok_or_else(overflow)
    }
}

fn scale(decimals: u32) -> u128 {
    10u128.pow(decimals.min(MAX_DECIMALS))
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the plain raw integer form used on the wire.
impl FromStr for Raw {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountParseError::InvalidCharacter(s.to_string()));
        }
        s.parse()
            .map(Raw)
            .map_err(|_| AmountParseError::Overflow(s.to_string()))
    }
}
