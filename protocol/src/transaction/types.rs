//! Small value types shared by clauses and transactions.
//!
//! Both are `Copy` and have fixed-width wire forms, so they can sit inside
//! other values without allocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::codec::rlp::write_uint;
use crate::codec::{CodecError, Decode, Decoder, Encode};
use crate::config::{BLOCK_REF_LENGTH, METER_GOV_TOKEN, METER_TOKEN};
use crate::types::Hash32;

// ---------------------------------------------------------------------------
// TokenType
// ---------------------------------------------------------------------------

/// Raised when a token name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown token selector {0:?}")]
pub struct UnknownTokenError(pub String);

/// Asset a clause's value is denominated in.
///
/// The wire carries a single selector byte. Selectors other than MTR and
/// MTRG decode to [`TokenType::Other`] and re-encode unchanged, so clauses
/// written by newer software survive a round trip through this crate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum TokenType {
    /// MTR, the gas settlement token.
    #[default]
    #[serde(rename = "MTR")]
    Meter,
    /// MTRG, the governance token.
    #[serde(rename = "MTRG")]
    MeterGov,
    /// A selector this version has no name for. Build these with
    /// `TokenType::from(byte)`; `Other(0)` and `Other(1)` are not canonical.
    Other(u8),
}

impl TokenType {
    /// The selector byte carried on the wire.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Meter => METER_TOKEN,
            Self::MeterGov => METER_GOV_TOKEN,
            Self::Other(selector) => selector,
        }
    }

    /// Whether the selector names MTR or MTRG.
    pub const fn is_known(self) -> bool {
        matches!(Self::from_selector(self.as_u8()), Self::Meter | Self::MeterGov)
    }

    const fn from_selector(selector: u8) -> Self {
        match selector {
            METER_TOKEN => Self::Meter,
            METER_GOV_TOKEN => Self::MeterGov,
            other => Self::Other(other),
        }
    }
}

impl From<u8> for TokenType {
    fn from(selector: u8) -> Self {
        Self::from_selector(selector)
    }
}

impl From<TokenType> for u8 {
    fn from(token: TokenType) -> Self {
        token.as_u8()
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meter => write!(f, "MTR"),
            Self::MeterGov => write!(f, "MTRG"),
            Self::Other(selector) => write!(f, "{selector}"),
        }
    }
}

impl FromStr for TokenType {
    type Err = UnknownTokenError;

    /// Accepts the ticker, a short alias, or a decimal selector byte.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mtr" | "meter" => Ok(Self::Meter),
            "mtrg" | "gov" => Ok(Self::MeterGov),
            other => other
                .parse::<u8>()
                .map(Self::from)
                .map_err(|_| UnknownTokenError(s.to_string())),
        }
    }
}

impl Encode for TokenType {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_uint(out, u64::from(self.as_u8()));
    }
}

impl Decode for TokenType {
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        decoder.u8().map(Self::from)
    }
}

// ---------------------------------------------------------------------------
// BlockRef
// ---------------------------------------------------------------------------

/// Binds a transaction to a block: big-endian height in the first four
/// bytes, the leading bytes of that block's ID in the last four.
///
/// On the wire the eight bytes are read as one big-endian `u64` and encoded
/// as a canonical integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct BlockRef([u8; BLOCK_REF_LENGTH]);

impl BlockRef {
    /// A reference to `number` with a zero suffix.
    pub fn new(number: u32) -> Self {
        let mut bytes = [0u8; BLOCK_REF_LENGTH];
        bytes[..4].copy_from_slice(&number.to_be_bytes());
        Self(bytes)
    }

    /// Takes the first eight bytes of a block ID. Block IDs start with the
    /// block's height, so the result names that block.
    pub fn from_block_id(block_id: &Hash32) -> Self {
        let mut bytes = [0u8; BLOCK_REF_LENGTH];
        bytes.copy_from_slice(&block_id.as_bytes()[..BLOCK_REF_LENGTH]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; BLOCK_REF_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Height of the referenced block.
    pub fn number(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn suffix(&self) -> [u8; 4] {
        [self.0[4], self.0[5], self.0[6], self.0[7]]
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_REF_LENGTH] {
        &self.0
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl From<u64> for BlockRef {
    fn from(packed: u64) -> Self {
        Self(packed.to_be_bytes())
    }
}

impl From<BlockRef> for u64 {
    fn from(block_ref: BlockRef) -> Self {
        block_ref.as_u64()
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.number(), hex::encode(self.suffix()))
    }
}

impl fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockRef({self})")
    }
}

impl Encode for BlockRef {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_uint(out, self.as_u64());
    }
}

impl Decode for BlockRef {
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        decoder.u64().map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_selector_values() {
        assert_eq!(TokenType::Meter.as_u8(), 0);
        assert_eq!(TokenType::MeterGov.as_u8(), 1);
        assert_eq!(TokenType::default(), TokenType::Meter);
    }

    #[test]
    fn token_from_selector_byte() {
        assert_eq!(TokenType::from(0), TokenType::Meter);
        assert_eq!(TokenType::from(1), TokenType::MeterGov);
        assert_eq!(TokenType::from(2), TokenType::Other(2));
        assert!(TokenType::MeterGov.is_known());
        assert!(!TokenType::from(0xff).is_known());
        assert_eq!(u8::from(TokenType::Other(7)), 7);
    }

    #[test]
    fn token_from_str_aliases() {
        assert_eq!("meter".parse::<TokenType>().unwrap(), TokenType::Meter);
        assert_eq!("MTRG".parse::<TokenType>().unwrap(), TokenType::MeterGov);
        assert_eq!("gov".parse::<TokenType>().unwrap(), TokenType::MeterGov);
        assert_eq!("1".parse::<TokenType>().unwrap(), TokenType::MeterGov);
        assert_eq!("9".parse::<TokenType>().unwrap(), TokenType::Other(9));
        assert_eq!(TokenType::Other(9).to_string(), "9");
        assert!("eth".parse::<TokenType>().is_err());
        assert!("256".parse::<TokenType>().is_err());
    }

    #[test]
    fn token_serde_uses_tickers() {
        assert_eq!(serde_json::to_string(&TokenType::MeterGov).unwrap(), "\"MTRG\"");
        let token: TokenType = serde_json::from_str("\"MTR\"").unwrap();
        assert_eq!(token, TokenType::Meter);
    }

    #[test]
    fn token_encoding() {
        assert_eq!(TokenType::Meter.to_rlp(), vec![0x80]);
        assert_eq!(TokenType::MeterGov.to_rlp(), vec![0x01]);
        assert_eq!(TokenType::from_rlp(&[0x02]).unwrap(), TokenType::Other(2));
        assert_eq!(TokenType::Other(2).to_rlp(), vec![0x02]);
        assert_eq!(TokenType::from_rlp(&[0x81, 0xc8]).unwrap(), TokenType::Other(0xc8));
        // Non-canonical or over-wide selectors are still framing errors.
        assert!(TokenType::from_rlp(&[0x00]).is_err());
        assert!(TokenType::from_rlp(&[0x82, 0x01, 0x00]).is_err());
    }

    #[test]
    fn block_ref_from_number() {
        let r = BlockRef::new(0x0102_0304);
        assert_eq!(r.as_bytes(), &[1, 2, 3, 4, 0, 0, 0, 0]);
        assert_eq!(r.number(), 0x0102_0304);
        assert_eq!(r.suffix(), [0; 4]);
    }

    #[test]
    fn block_ref_from_block_id() {
        let mut id = [0u8; 32];
        id[..8].copy_from_slice(&[0, 0, 0x30, 0x39, 0xde, 0xad, 0xbe, 0xef]);
        id[8] = 0xff;
        let r = BlockRef::from_block_id(&Hash32::new(id));
        assert_eq!(r.number(), 12345);
        assert_eq!(r.suffix(), [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(r.to_string(), "12345-deadbeef");
    }

    #[test]
    fn block_ref_packs_big_endian() {
        let r = BlockRef::new(1);
        assert_eq!(r.as_u64(), 1u64 << 32);
        assert_eq!(BlockRef::from(r.as_u64()), r);
    }

    #[test]
    fn block_ref_encodes_as_minimal_integer() {
        assert_eq!(BlockRef::default().to_rlp(), vec![0x80]);
        assert_eq!(BlockRef::new(1).to_rlp(), vec![0x85, 1, 0, 0, 0, 0]);
        let r = BlockRef::from_bytes([0xaa; 8]);
        assert_eq!(BlockRef::from_rlp(&r.to_rlp()).unwrap(), r);
    }

    #[test]
    fn block_ref_ordering_follows_height() {
        assert!(BlockRef::new(9) < BlockRef::new(10));
    }

    #[test]
    fn block_ref_serde_as_integer() {
        let r = BlockRef::new(2);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, (2u64 << 32).to_string());
        let back: BlockRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
