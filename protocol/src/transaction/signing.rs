//! Transaction signing with secp256k1 keys.
//!
//! Signing is a separate step from building because the key may not be
//! available at construction time (hardware wallet, air-gapped signer). The
//! signed message is [`Transaction::signing_hash`], which excludes the
//! signature field.

use tracing::debug;

use super::builder::Transaction;
use super::verification::TransactionError;
use crate::crypto::keys::PrivateKey;

/// Signs `tx` with `key` and returns the signed copy.
///
/// The input is left unsigned. Re-signing an already signed transaction
/// replaces its signature, since the signing hash never covers it.
///
/// # Example
///
/// ```rust
/// use meter_protocol::crypto::PrivateKey;
/// use meter_protocol::transaction::{sign_transaction, TransactionBuilder};
///
/// let key = PrivateKey::generate();
/// let tx = TransactionBuilder::new().chain_tag(88).nonce(1).build();
///
/// let signed = sign_transaction(&tx, &key).unwrap();
/// assert!(!tx.is_signed());
/// assert_eq!(signed.signer().unwrap(), Some(key.address()));
/// ```
pub fn sign_transaction(
    tx: &Transaction,
    key: &PrivateKey,
) -> Result<Transaction, TransactionError> {
    let signing_hash = tx.signing_hash();
    let signature = key.sign_hash(&signing_hash)?;
    debug!(signer = %key.address(), %signing_hash, "transaction signed");
    Ok(tx.with_signature(signature))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SIGNATURE_LENGTH;
    use crate::crypto::signatures::recover_address;
    use crate::transaction::builder::TransactionBuilder;

    fn sample() -> Transaction {
        TransactionBuilder::new()
            .chain_tag(88)
            .gas(21_000)
            .nonce(1)
            .build()
    }

    #[test]
    fn sign_attaches_65_byte_signature() {
        let key = PrivateKey::generate();
        let signed = sign_transaction(&sample(), &key).unwrap();
        assert_eq!(signed.signature().len(), SIGNATURE_LENGTH);
        assert!(signed.signature()[64] <= 1);
    }

    #[test]
    fn signing_leaves_input_untouched() {
        let tx = sample();
        let before = tx.clone();
        let _ = sign_transaction(&tx, &PrivateKey::generate()).unwrap();
        assert_eq!(tx, before);
    }

    #[test]
    fn signing_does_not_change_signing_hash() {
        let tx = sample();
        let signed = sign_transaction(&tx, &PrivateKey::generate()).unwrap();
        assert_eq!(tx.signing_hash(), signed.signing_hash());
    }

    #[test]
    fn signature_recovers_to_key_address() {
        let key = PrivateKey::from_bytes(&[5u8; 32]).unwrap();
        let signed = sign_transaction(&sample(), &key).unwrap();
        let recovered = recover_address(&signed.signing_hash(), signed.signature()).unwrap();
        assert_eq!(recovered, key.address());
    }

    #[test]
    fn resigning_replaces_signature() {
        let a = PrivateKey::from_bytes(&[5u8; 32]).unwrap();
        let b = PrivateKey::from_bytes(&[6u8; 32]).unwrap();
        let once = sign_transaction(&sample(), &a).unwrap();
        let twice = sign_transaction(&once, &b).unwrap();
        assert_eq!(twice.signer().unwrap(), Some(b.address()));
    }

    #[test]
    fn signing_is_deterministic() {
        let key = PrivateKey::from_bytes(&[5u8; 32]).unwrap();
        let a = sign_transaction(&sample(), &key).unwrap();
        let b = sign_transaction(&sample(), &key).unwrap();
        assert_eq!(a.encode(), b.encode());
    }
}
