//! # Cryptographic Primitives
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **BLAKE2b-256** (`blake2`) for signing hashes and transaction IDs.
//! - **Keccak-256** (`sha3`) for deriving addresses from public keys.
//! - **secp256k1 recoverable ECDSA** (`k256`) for signing and signer recovery.
//!
//! Nothing in here performs I/O. A transaction can be hashed and signed on
//! an air-gapped machine.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake2b256, blake2b256_multi, keccak256, Blake2bHasher};
pub use keys::{KeyError, PrivateKey};
pub use signatures::{recover_address, recover_public_key, sign_hash, verify_signer, SignatureError};
