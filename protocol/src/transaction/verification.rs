//! Signer recovery and transaction identity.
//!
//! A transaction does not name its sender. The sender is recovered from the
//! signature over the signing hash, and the transaction ID binds the two:
//! `id = blake2b256(signing_hash ++ signer)`. Two senders signing the same
//! body therefore produce two different transactions.

use thiserror::Error;
use tracing::trace;

use super::builder::Transaction;
use crate::codec::CodecError;
use crate::crypto::hash::Blake2bHasher;
use crate::crypto::signatures::{recover_address, SignatureError};
use crate::types::{Address, Hash32};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from transaction-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// A signature is present but no signer can be recovered from it.
    #[error("signature recovery failed: {0}")]
    SignatureRecoveryFailed(String),

    /// The key could not sign the signing hash.
    #[error("signing failed")]
    SigningFailed,

    /// The wire bytes are not a canonical transaction.
    #[error("decode failed: {0}")]
    Codec(#[from] CodecError),
}

impl From<SignatureError> for TransactionError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::SignatureRecoveryFailed(reason) => {
                Self::SignatureRecoveryFailed(reason)
            }
            SignatureError::SigningFailed => Self::SigningFailed,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

impl Transaction {
    /// Recovers the sender.
    ///
    /// `Ok(None)` means the transaction is unsigned. A signature that is
    /// present but unusable is an error, never `None`.
    pub fn signer(&self) -> Result<Option<Address>, TransactionError> {
        if !self.is_signed() {
            return Ok(None);
        }
        let signing_hash = self.signing_hash();
        let signer = recover_address(&signing_hash, self.signature()).map_err(|err| {
            trace!(%signing_hash, error = %err, "signer recovery failed");
            TransactionError::from(err)
        })?;
        Ok(Some(signer))
    }

    /// The transaction ID. The all-zero hash when unsigned.
    pub fn id(&self) -> Result<Hash32, TransactionError> {
        if !self.is_signed() {
            return Ok(Hash32::zero());
        }
        let signing_hash = self.signing_hash();
        let signer = recover_address(&signing_hash, self.signature())?;
        Ok(derive_id(&signing_hash, &signer))
    }

    /// Whether the transaction is signed by `expected`.
    pub fn is_signed_by(&self, expected: &Address) -> bool {
        matches!(self.signer(), Ok(Some(signer)) if signer == *expected)
    }
}

fn derive_id(signing_hash: &Hash32, signer: &Address) -> Hash32 {
    let mut hasher = Blake2bHasher::new();
    hasher.update(signing_hash.as_bytes()).update(signer.as_bytes());
    hasher.finalize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
