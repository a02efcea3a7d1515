//! # Hashing Utilities
//!
//! Two digests, each with exactly one job:
//!
//! - **BLAKE2b-256**: signing hashes and transaction IDs. Exposed both as a
//!   one-shot function and as an incremental [`Blake2bHasher`] so the codec
//!   can stream into it and ID derivation can feed `signing_hash || signer`
//!   without building a temporary buffer.
//! - **Keccak-256**: address derivation from secp256k1 public keys. This is
//!   the original Keccak padding, not NIST SHA3-256; the two produce
//!   different digests and only Keccak matches existing account addresses.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha3::Keccak256;

use crate::types::Hash32;

type Blake2b256 = Blake2b<U32>;

/// Incremental BLAKE2b-256: write any number of slices, then finalize.
#[derive(Clone, Default)]
pub struct Blake2bHasher {
    inner: Blake2b256,
}

impl Blake2bHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds more bytes into the running digest.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        Digest::update(&mut self.inner, data);
        self
    }

    /// Consumes the hasher and returns the 32-byte digest.
    pub fn finalize(self) -> Hash32 {
        let out: [u8; 32] = self.inner.finalize().into();
        Hash32::new(out)
    }
}

/// BLAKE2b-256 of a single buffer.
pub fn blake2b256(data: &[u8]) -> Hash32 {
    let mut hasher = Blake2bHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// BLAKE2b-256 over several slices, equivalent to hashing their concatenation.
pub fn blake2b256_multi(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Blake2bHasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// Keccak-256 of a single buffer, as raw bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b256_known_vector() {
        let hash = blake2b256(b"");
        assert_eq!(
            hex::encode(hash.as_bytes()),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn keccak256_known_vector() {
        // Keccak-256 of the empty string, not SHA3-256 (which is a7ffc6f8...).
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn blake2b256_deterministic() {
        assert_eq!(blake2b256(b"meter"), blake2b256(b"meter"));
        assert_ne!(blake2b256(b"meter"), blake2b256(b"Meter"));
    }

    #[test]
    fn multi_matches_concatenation() {
        let multi = blake2b256_multi(&[&b"hello"[..], &b" "[..], &b"world"[..]]);
        assert_eq!(multi, blake2b256(b"hello world"));
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut hasher = Blake2bHasher::new();
        hasher.update(b"signing").update(b"hash");
        assert_eq!(hasher.finalize(), blake2b256(b"signinghash"));
    }
}
