//! # Key Management
//!
//! secp256k1 private keys for signing transactions.
//!
//! Key bytes are never logged, and `Debug` prints only the derived address.
//! Keys can be created from OS randomness, raw bytes, or hex (the form the
//! CLI reads from its environment).

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use super::signatures::{sign_hash, SignatureError};
use crate::config::PRIVATE_KEY_LENGTH;
use crate::types::{Address, Hash32};

/// Errors that can occur during key operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid private key: wrong length, not hex, or not a valid scalar")]
    InvalidPrivateKey,
}

/// A secp256k1 signing key.
///
/// Does not implement `Serialize`; exporting secret material
/// goes through [`PrivateKey::secret_key_bytes`].
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generates a fresh key from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Builds a key from its 32-byte big-endian scalar. Zero and values at or
    /// above the curve order are rejected.
    pub fn from_bytes(bytes: &[u8; PRIVATE_KEY_LENGTH]) -> Result<Self, KeyError> {
        let signing_key =
            SigningKey::from_bytes(&(*bytes).into()).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Parses a hex-encoded key, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        hex::decode_to_slice(digits.trim(), &mut bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> VerifyingKey {
        *self.signing_key.verifying_key()
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Address {
        Address::from_public_key(self.signing_key.verifying_key())
    }

    /// Signs a 32-byte digest, returning the 65-byte recoverable signature.
    pub fn sign_hash(&self, hash: &Hash32) -> Result<Vec<u8>, SignatureError> {
        sign_hash(self, hash)
    }

    /// Exports the raw secret scalar. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.signing_key.to_bytes().into()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(address={})", self.address())
    }
}

impl PartialEq for PrivateKey {
    /// Compares derived addresses rather than secret bytes.
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for PrivateKey {}
