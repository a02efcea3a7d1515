//! # Recoverable Signatures
//!
//! secp256k1 ECDSA in its recoverable form. A signature is 65 bytes,
//! `r || s || v`, where `v` is the recovery id. Transactions do not carry the
//! sender's public key; it is recovered from `(signing_hash, signature)` and
//! hashed down to an [`Address`].
//!
//! Everything here operates on a 32-byte prehash. Callers hash first (the
//! transaction layer uses BLAKE2b-256), then sign or recover.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use thiserror::Error;
use tracing::trace;

use super::keys::PrivateKey;
use crate::config::SIGNATURE_LENGTH;
use crate::types::{Address, Hash32};

/// Errors during signature operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature bytes are malformed or do not recover to a public key.
    #[error("signature recovery failed: {0}")]
    SignatureRecoveryFailed(String),

    /// The backend refused to sign the digest.
    #[error("signing failed")]
    SigningFailed,
}

/// Signs a 32-byte digest and returns the 65-byte recoverable signature.
///
/// Signatures are deterministic (RFC 6979) and normalized to low-S.
pub fn sign_hash(key: &PrivateKey, hash: &Hash32) -> Result<Vec<u8>, SignatureError> {
    let (signature, recovery_id) = key
        .signing_key()
        .sign_prehash_recoverable(hash.as_bytes())
        .map_err(|_| SignatureError::SigningFailed)?;

    let mut out = Vec::with_capacity(SIGNATURE_LENGTH);
    out.extend_from_slice(&signature.to_bytes());
    out.push(recovery_id.to_byte());
    Ok(out)
}

/// Recovers the public key that produced `signature` over `hash`.
///
/// High-S signatures are accepted: `(r, n - s, v ^ 1)` recovers the same key
/// as `(r, s, v)`, so they are normalized before recovery.
pub fn recover_public_key(hash: &Hash32, signature: &[u8]) -> Result<VerifyingKey, SignatureError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::SignatureRecoveryFailed(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }

    let mut recovery_id = RecoveryId::from_byte(signature[64]).ok_or_else(|| {
        SignatureError::SignatureRecoveryFailed(format!("invalid recovery id {}", signature[64]))
    })?;
    let mut sig = Signature::from_slice(&signature[..64])
        .map_err(|_| SignatureError::SignatureRecoveryFailed("invalid r/s scalars".into()))?;
    if let Some(low_s) = sig.normalize_s() {
        sig = low_s;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    VerifyingKey::recover_from_prehash(hash.as_bytes(), &sig, recovery_id).map_err(|err| {
        trace!(%hash, error = %err, "public key recovery failed");
        SignatureError::SignatureRecoveryFailed("no public key recovers from signature".into())
    })
}

/// Recovers the signer's address from `signature` over `hash`.
pub fn recover_address(hash: &Hash32, signature: &[u8]) -> Result<Address, SignatureError> {
    recover_public_key(hash, signature).map(|key| Address::from_public_key(&key))
}

/// Returns `true` if `signature` over `hash` recovers to `expected`.
pub fn verify_signer(hash: &Hash32, signature: &[u8], expected: &Address) -> bool {
    matches!(recover_address(hash, signature), Ok(addr) if addr == *expected)
}
