//! 20-byte account address.

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{parse_fixed, ParseError};
use crate::config::{ADDRESS_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH};
use crate::crypto::hash::keccak256;

/// An account address: the last 20 bytes of the Keccak-256 hash of the
/// account's uncompressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The all-zero address.
    pub const fn zero() -> Self {
        Self([0u8; ADDRESS_LENGTH])
    }

    /// Parses the `0x`-prefixed (or bare) hex form.
    ///
    /// This is the constructor for anything that came from outside the
    /// process: user input, config files, RPC payloads.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parse_fixed::<ADDRESS_LENGTH>(s).map(Self)
    }

    /// Parses a trusted literal, panicking on malformed input.
    ///
    /// Only for compile-time-known constants. Never call this on untrusted
    /// data; use [`Address::parse`] instead.
    pub fn must_parse(s: &str) -> Self {
        match Self::parse(s) {
            Ok(addr) => addr,
            Err(err) => panic!("invalid address literal {s:?}: {err}"),
        }
    }

    /// Copies a slice of exactly 20 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; ADDRESS_LENGTH] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Derives the address owned by a secp256k1 public key.
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let encoded = point.as_bytes();
        debug_assert_eq!(encoded.len(), UNCOMPRESSED_PUBLIC_KEY_LENGTH);
        // Skip the 0x04 SEC1 tag; the hash covers x || y only.
        let digest = keccak256(&encoded[1..]);
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(&digest[12..]);
        Self(out)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Owned copy of the raw bytes.
    pub fn to_bytes(self) -> [u8; ADDRESS_LENGTH] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
