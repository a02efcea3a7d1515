//! 32-byte content identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{parse_fixed, ParseError};
use crate::config::HASH_LENGTH;

/// A 32-byte hash value. Used for transaction IDs, signing hashes, block IDs
/// and the `depends_on` reference of a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32([u8; HASH_LENGTH]);

impl Hash32 {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The all-zero hash. Also the ID of an unsigned transaction.
    pub const fn zero() -> Self {
        Self([0u8; HASH_LENGTH])
    }

    /// Parses the `0x`-prefixed (or bare) hex form.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        parse_fixed::<HASH_LENGTH>(s).map(Self)
    }

    /// Parses a trusted literal, panicking on malformed input.
    ///
    /// Only for compile-time-known constants. Untrusted input goes through
    /// [`Hash32::parse`].
    pub fn must_parse(s: &str) -> Self {
        match Self::parse(s) {
            Ok(hash) => hash,
            Err(err) => panic!("invalid hash literal {s:?}: {err}"),
        }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let bytes: [u8; HASH_LENGTH] = slice.try_into().ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; HASH_LENGTH] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LENGTH]
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({self})")
    }
}

impl FromStr for Hash32 {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for Hash32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LENGTH]> for Hash32 {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
