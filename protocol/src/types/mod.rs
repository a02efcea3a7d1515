//! # Fixed-Width Identifier Types
//!
//! [`Address`] (20 bytes) and [`Hash32`] (32 bytes) are plain value types:
//! `Copy`, byte-wise equality, and a single string contract shared by both.
//!
//! ## String form
//!
//! Formatting always emits `0x` followed by lowercase hex. Parsing accepts
//! exactly `2 * N` hex digits, optionally preceded by a `0x`/`0X` prefix.
//! Anything else is rejected with a [`ParseError`]; nothing is padded,
//! truncated, or silently zeroed.

pub mod address;
pub mod hash32;

pub use address::Address;
pub use hash32::Hash32;

use thiserror::Error;

/// Errors produced when parsing an identifier from its string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input (after prefix handling) does not carry exactly `2 * N` digits.
    #[error("invalid length: expected {expected} hex digits, got {actual} characters")]
    InvalidLength { expected: usize, actual: usize },

    /// A two-character prefix is present but is not `0x`.
    #[error("invalid prefix: expected 0x")]
    InvalidPrefix,

    /// The digits are not valid hexadecimal.
    #[error("invalid hex digits")]
    InvalidHex,
}

/// Parses `s` into exactly `N` bytes following the identifier string contract.
pub(crate) fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let bytes = s.as_bytes();
    let digits = if bytes.len() == N * 2 {
        bytes
    } else if bytes.len() == N * 2 + 2 {
        if bytes[0] != b'0' || !matches!(bytes[1], b'x' | b'X') {
            return Err(ParseError::InvalidPrefix);
        }
        &bytes[2..]
    } else {
        return Err(ParseError::InvalidLength {
            expected: N * 2,
            actual: bytes.len(),
        });
    };

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|_| ParseError::InvalidHex)?;
    Ok(out)
}
