//! # Canonical Codec
//!
//! Deterministic, self-describing encoding for clauses and transactions.
//! The same bytes serve two purposes: they go over the wire, and (minus the
//! signature) they are what gets hashed and signed. A single non-canonical
//! byte therefore changes a transaction's identity, so decoding is strict:
//! it accepts exactly one encoding per logical value.
//!
//! ## Format
//!
//! Recursive Length Prefix framing. Every item is either a byte string or a
//! list of items, each carrying its own length header:
//!
//! ```text
//! [0x00, 0x7f]  single byte, is its own encoding
//! [0x80, 0xb7]  string of 0..=55 bytes, length in the header byte
//! [0xb8, 0xbf]  longer string, 1..=8 big-endian length bytes follow
//! [0xc0, 0xf7]  list with 0..=55 payload bytes
//! [0xf8, 0xff]  longer list, 1..=8 big-endian length bytes follow
//! ```
//!
//! Integers are minimal big-endian strings: zero is the empty string and
//! leading zero bytes are rejected. Optional fixed-width values encode
//! absence as the empty string, which can never be confused with a
//! zero-filled 20- or 32-byte value.

pub mod rlp;

pub use rlp::{Decoder, RlpItem};

use thiserror::Error;

/// Errors produced while decoding canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The input ends before a header or payload is complete.
    #[error("truncated encoding")]
    Truncated,

    /// Bytes remain after the last expected item.
    #[error("trailing bytes after encoded value")]
    TrailingBytes,

    /// A header, length, or field does not follow the canonical form.
    #[error("malformed framing: {0}")]
    MalformedFraming(String),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFraming(reason.into())
    }
}

/// Types with a canonical encoding.
pub trait Encode {
    /// Appends the canonical encoding to `out`.
    fn encode_to(&self, out: &mut Vec<u8>);

    /// Encodes into a fresh buffer.
    fn to_rlp(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_to(&mut out);
        out
    }
}

/// Types that can be read back from their canonical encoding.
pub trait Decode: Sized {
    /// Reads one value from the decoder, advancing past it.
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError>;

    /// Decodes a complete buffer. Bytes left over after the value are an
    /// error, not something to silently ignore.
    fn from_rlp(data: &[u8]) -> Result<Self, CodecError> {
        let mut decoder = Decoder::new(data);
        let value = Self::decode_from(&mut decoder)?;
        decoder.finish()?;
        Ok(value)
    }
}
