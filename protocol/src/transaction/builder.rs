//! The transaction body and its builder.
//!
//! [`TransactionBuilder`] assembles an unsigned [`Transaction`]. Signing is
//! a separate step ([`super::signing`]) so that construction stays testable
//! without key material and works on an offline machine.

use num_bigint::BigUint;
use std::fmt;
use tracing::debug;

use super::clause::Clause;
use super::types::BlockRef;
use crate::codec::rlp::{write_bytes, write_list, write_optional, write_uint};
use crate::codec::{CodecError, Decode, Decoder, Encode, RlpItem};
use crate::config::{GAS_PRICE_COEF_DIVISOR, HASH_LENGTH};
use crate::crypto::hash::blake2b256;
use crate::types::Hash32;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A Meter transaction.
///
/// Immutable once built. The only way to attach a signature is
/// [`Transaction::with_signature`], which returns a new value.
///
/// # Canonical Byte Format
///
/// An RLP list of, in order: chain tag, block ref, expiration, clauses,
/// gas price coefficient, gas, depends-on, nonce, reserved, signature. The
/// signing hash covers the same list without the trailing signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    chain_tag: u8,
    block_ref: BlockRef,
    expiration: u32,
    clauses: Vec<Clause>,
    gas_price_coef: u8,
    gas: u64,
    depends_on: Option<Hash32>,
    nonce: u64,
    reserved: Vec<RlpItem>,
    signature: Vec<u8>,
}

impl Transaction {
    pub fn chain_tag(&self) -> u8 {
        self.chain_tag
    }

    pub fn block_ref(&self) -> BlockRef {
        self.block_ref
    }

    /// Number of blocks after the block ref during which the transaction
    /// may be included.
    pub fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Clauses in execution order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn gas_price_coef(&self) -> u8 {
        self.gas_price_coef
    }

    pub fn gas(&self) -> u64 {
        self.gas
    }

    /// Transaction that must be executed before this one, if any.
    pub fn depends_on(&self) -> Option<Hash32> {
        self.depends_on
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn reserved(&self) -> &[RlpItem] {
        &self.reserved
    }

    pub fn has_reserved_fields(&self) -> bool {
        !self.reserved.is_empty()
    }

    /// Raw signature bytes; empty when unsigned.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Returns a copy of this transaction carrying `signature`.
    pub fn with_signature(&self, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            signature: signature.into(),
            ..self.clone()
        }
    }

    /// BLAKE2b-256 of the body encoded without its signature.
    pub fn signing_hash(&self) -> Hash32 {
        let mut body = Vec::new();
        self.encode_body(&mut body, false);
        blake2b256(&body)
    }

    /// `base + base * gas_price_coef / 255`, rounded down.
    pub fn gas_price(&self, base_gas_price: &BigUint) -> BigUint {
        let premium =
            base_gas_price * u32::from(self.gas_price_coef) / u32::from(GAS_PRICE_COEF_DIVISOR);
        base_gas_price + premium
    }

    /// Whether the transaction can no longer be included at `block_number`.
    pub fn is_expired(&self, block_number: u32) -> bool {
        // Widened so that `number + expiration` cannot wrap.
        let last_valid = u64::from(self.block_ref.number()) + u64::from(self.expiration);
        u64::from(block_number) > last_valid
    }

    /// Length of the full canonical encoding, signature included.
    pub fn encoded_size(&self) -> usize {
        self.to_rlp().len()
    }

    pub fn size(&self) -> usize {
        self.encoded_size()
    }

    /// Canonical wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_rlp()
    }

    /// Decodes wire bytes. The whole buffer must be exactly one transaction.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        Self::from_rlp(data).map_err(|err| {
            debug!(len = data.len(), error = %err, "transaction decode failed");
            err
        })
    }

    fn encode_body(&self, out: &mut Vec<u8>, with_signature: bool) {
        write_list(out, |payload| {
            write_uint(payload, u64::from(self.chain_tag));
            self.block_ref.encode_to(payload);
            write_uint(payload, u64::from(self.expiration));
            write_list(payload, |clauses| {
                for clause in &self.clauses {
                    clause.encode_to(clauses);
                }
            });
            write_uint(payload, u64::from(self.gas_price_coef));
            write_uint(payload, self.gas);
            write_optional(
                payload,
                self.depends_on.as_ref().map(|hash| &hash.as_bytes()[..]),
            );
            write_uint(payload, self.nonce);
            write_list(payload, |reserved| {
                for item in &self.reserved {
                    item.encode_to(reserved);
                }
            });
            if with_signature {
                write_bytes(payload, &self.signature);
            }
        });
    }
}

impl Encode for Transaction {
    fn encode_to(&self, out: &mut Vec<u8>) {
        self.encode_body(out, true);
    }
}

impl Decode for Transaction {
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let mut fields = decoder.list()?;

        let chain_tag = fields.u8()?;
        let block_ref = BlockRef::decode_from(&mut fields)?;
        let expiration = fields.u32()?;

        let mut clause_list = fields.list()?;
        let mut clauses = Vec::new();
        while !clause_list.is_empty() {
            clauses.push(Clause::decode_from(&mut clause_list)?);
        }

        let gas_price_coef = fields.u8()?;
        let gas = fields.u64()?;
        let depends_on = fields.optional_fixed::<HASH_LENGTH>()?.map(Hash32::new);
        let nonce = fields.u64()?;

        let mut reserved_list = fields.list()?;
        let mut reserved = Vec::new();
        while !reserved_list.is_empty() {
            reserved.push(RlpItem::decode_from(&mut reserved_list)?);
        }

        let signature = fields.bytes()?.to_vec();
        fields.finish()?;

        Ok(Self {
            chain_tag,
            block_ref,
            expiration,
            clauses,
            gas_price_coef,
            gas,
            depends_on,
            nonce,
            reserved,
            signature,
        })
    }
}

impl fmt::Display for Transaction {
    /// Multi-line dump for logs and the CLI.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self
            .id()
            .map(|id| id.to_string())
            .unwrap_or_else(|_| "N/A".to_string());
        let from = match self.signer() {
            Ok(Some(signer)) => signer.to_string(),
            _ => "N/A".to_string(),
        };
        let depends_on = match &self.depends_on {
            Some(hash) => hash.to_string(),
            None => "nil".to_string(),
        };

        writeln!(f, "Tx({id}, {} bytes)", self.size())?;
        writeln!(f, "\tFrom:\t\t\t{from}")?;
        writeln!(f, "\tClauses:")?;
        for clause in &self.clauses {
            writeln!(f, "\t\t{clause}")?;
        }
        writeln!(f, "\tGasPriceCoef:\t{}", self.gas_price_coef)?;
        writeln!(f, "\tGas:\t\t\t{}", self.gas)?;
        writeln!(f, "\tChainTag:\t\t{}", self.chain_tag)?;
        writeln!(f, "\tBlockRef:\t\t{}", self.block_ref)?;
        writeln!(f, "\tExpiration:\t\t{}", self.expiration)?;
        writeln!(f, "\tDependsOn:\t\t{depends_on}")?;
        writeln!(f, "\tNonce:\t\t\t{}", self.nonce)?;
        writeln!(f, "\tReserved:\t\t{} item(s)", self.reserved.len())?;
        write!(f, "\tSignature:\t\t0x{}", hex::encode(&self.signature))
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] values.
///
/// Every setter overwrites its field except [`TransactionBuilder::clause`],
/// which appends. Nothing is validated; a node decides whether the result
/// is acceptable.
///
/// ```rust
/// use meter_protocol::transaction::{Clause, TransactionBuilder};
/// use meter_protocol::transaction::types::BlockRef;
/// use meter_protocol::types::Address;
/// use num_bigint::BigUint;
///
/// let to = Address::must_parse("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed");
/// let tx = TransactionBuilder::new()
///     .chain_tag(88)
///     .block_ref(BlockRef::new(1_000))
///     .expiration(100)
///     .gas(21_000)
///     .nonce(1)
///     .clause(Clause::new(Some(to)).with_value(BigUint::from(1u8)))
///     .build();
///
/// assert!(!tx.is_signed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    chain_tag: u8,
    block_ref: BlockRef,
    expiration: u32,
    clauses: Vec<Clause>,
    gas_price_coef: u8,
    gas: u64,
    depends_on: Option<Hash32>,
    nonce: u64,
    reserved: Vec<RlpItem>,
}

impl TransactionBuilder {
    /// An empty builder; every field starts at zero or empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain_tag(mut self, chain_tag: u8) -> Self {
        self.chain_tag = chain_tag;
        self
    }

    pub fn block_ref(mut self, block_ref: BlockRef) -> Self {
        self.block_ref = block_ref;
        self
    }

    pub fn expiration(mut self, expiration: u32) -> Self {
        self.expiration = expiration;
        self
    }

    /// Appends a clause after those already added.
    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn gas_price_coef(mut self, coef: u8) -> Self {
        self.gas_price_coef = coef;
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn depends_on(mut self, depends_on: Option<Hash32>) -> Self {
        self.depends_on = depends_on;
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets uninterpreted extension items. Leave empty unless a newer
    /// protocol version defines them.
    pub fn reserved(mut self, reserved: Vec<RlpItem>) -> Self {
        self.reserved = reserved;
        self
    }

    /// Consumes the builder and produces an unsigned [`Transaction`].
    pub fn build(self) -> Transaction {
        Transaction {
            chain_tag: self.chain_tag,
            block_ref: self.block_ref,
            expiration: self.expiration,
            clauses: self.clauses,
            gas_price_coef: self.gas_price_coef,
            gas: self.gas,
            depends_on: self.depends_on,
            nonce: self.nonce,
            reserved: self.reserved,
            signature: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::types::TokenType;
    use crate::types::Address;

    fn recipient() -> Address {
        Address::must_parse("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed")
    }

    fn sample_tx() -> Transaction {
        TransactionBuilder::new()
            .chain_tag(88)
            .block_ref(BlockRef::new(1_000))
            .expiration(100)
            .gas_price_coef(128)
            .gas(21_000)
            .nonce(1_234_567)
            .clause(
                Clause::new(Some(recipient()))
                    .with_value(BigUint::from(2_000_000_000_000_000_000u128)),
            )
            .build()
    }

    #[test]
    fn builder_sets_every_field() {
        let dep = Hash32::new([9u8; 32]);
        let tx = TransactionBuilder::new()
            .chain_tag(1)
            .block_ref(BlockRef::new(2))
            .expiration(3)
            .gas_price_coef(4)
            .gas(5)
            .nonce(6)
            .depends_on(Some(dep))
            .reserved(vec![RlpItem::Bytes(vec![1])])
            .build();
        assert_eq!(tx.chain_tag(), 1);
        assert_eq!(tx.block_ref(), BlockRef::new(2));
        assert_eq!(tx.expiration(), 3);
        assert_eq!(tx.gas_price_coef(), 4);
        assert_eq!(tx.gas(), 5);
        assert_eq!(tx.nonce(), 6);
        assert_eq!(tx.depends_on(), Some(dep));
        assert!(tx.has_reserved_fields());
        assert!(!tx.is_signed());
    }

    #[test]
    fn builder_appends_clauses_in_order() {
        let a = Clause::new(None).with_data(vec![1]);
        let b = Clause::new(Some(recipient()));
        let tx = TransactionBuilder::new()
            .clause(a.clone())
            .clause(b.clone())
            .build();
        assert_eq!(tx.clauses(), &[a, b]);
    }

    #[test]
    fn setters_overwrite() {
        let tx = TransactionBuilder::new().gas(1).gas(2).build();
        assert_eq!(tx.gas(), 2);
    }

    #[test]
    fn empty_builder_encoding() {
        // Ten fields, all empty: eight empty strings and two empty lists.
        let tx = TransactionBuilder::new().build();
        assert_eq!(
            tx.encode(),
            vec![0xca, 0x80, 0x80, 0x80, 0xc0, 0x80, 0x80, 0x80, 0x80, 0xc0, 0x80]
        );
    }

    #[test]
    fn signing_hash_ignores_signature() {
        let tx = sample_tx();
        let signed = tx.with_signature(vec![1u8; 65]);
        assert_eq!(tx.signing_hash(), signed.signing_hash());
        assert_ne!(tx.encode(), signed.encode());
    }

    #[test]
    fn signing_hash_changes_with_fields() {
        let a = sample_tx();
        let b = TransactionBuilder::new().nonce(1).build();
        let c = TransactionBuilder::new().nonce(2).build();
        assert_ne!(a.signing_hash(), b.signing_hash());
        assert_ne!(b.signing_hash(), c.signing_hash());
    }

    #[test]
    fn with_signature_leaves_source_unsigned() {
        let tx = sample_tx();
        let signed = tx.with_signature(vec![7u8; 65]);
        assert!(tx.signature().is_empty());
        assert_eq!(signed.signature(), &[7u8; 65][..]);
    }

    #[test]
    fn gas_price_formula() {
        let base = BigUint::from(100u32);
        let tx = TransactionBuilder::new().gas_price_coef(255).build();
        assert_eq!(tx.gas_price(&base), BigUint::from(200u32));
        let tx = TransactionBuilder::new().gas_price_coef(0).build();
        assert_eq!(tx.gas_price(&base), BigUint::from(100u32));
        let tx = TransactionBuilder::new().gas_price_coef(128).build();
        // 100 * 128 / 255 = 50.19..., floored.
        assert_eq!(tx.gas_price(&base), BigUint::from(150u32));
    }

    #[test]
    fn gas_price_handles_large_base() {
        let base = BigUint::from(u128::MAX);
        let tx = TransactionBuilder::new().gas_price_coef(255).build();
        assert_eq!(tx.gas_price(&base), &base * 2u32);
    }

    #[test]
    fn expiration_boundary() {
        let tx = TransactionBuilder::new()
            .block_ref(BlockRef::new(1_000))
            .expiration(100)
            .build();
        assert!(!tx.is_expired(1_000));
        assert!(!tx.is_expired(1_100));
        assert!(tx.is_expired(1_101));
    }

    #[test]
    fn expiration_does_not_wrap() {
        let tx = TransactionBuilder::new()
            .block_ref(BlockRef::new(u32::MAX - 1))
            .expiration(u32::MAX)
            .build();
        assert!(!tx.is_expired(u32::MAX));
    }

    #[test]
    fn encoded_size_matches_encoding() {
        let tx = sample_tx().with_signature(vec![0u8; 65]);
        assert_eq!(tx.encoded_size(), tx.encode().len());
        assert_eq!(tx.size(), tx.encoded_size());
    }

    #[test]
    fn roundtrip_with_reserved_and_dependency() {
        let tx = TransactionBuilder::new()
            .chain_tag(82)
            .block_ref(BlockRef::from_bytes([0, 0, 1, 0, 0xaa, 0xbb, 0xcc, 0xdd]))
            .expiration(720)
            .gas_price_coef(1)
            .gas(50_000)
            .depends_on(Some(Hash32::new([0xee; 32])))
            .nonce(u64::MAX)
            .clause(Clause::new(None).with_data(vec![0x60; 80]))
            .clause(
                Clause::new(Some(recipient()))
                    .with_token(TokenType::MeterGov)
                    .with_value(BigUint::from(5u8)),
            )
            .reserved(vec![
                RlpItem::Bytes(vec![1, 2, 3]),
                RlpItem::List(vec![RlpItem::Bytes(vec![])]),
            ])
            .build()
            .with_signature(vec![3u8; 65]);

        let bytes = tx.encode();
        let decoded = Transaction::decode(&bytes).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.encode(), bytes);
    }

    #[test]
    fn zero_dependency_differs_from_none() {
        let none = TransactionBuilder::new().build();
        let zero = TransactionBuilder::new()
            .depends_on(Some(Hash32::zero()))
            .build();
        assert_ne!(none.encode(), zero.encode());
        assert_eq!(
            Transaction::decode(&zero.encode()).unwrap().depends_on(),
            Some(Hash32::zero())
        );
    }

    #[test]
    fn decode_rejects_truncation_and_trailing() {
        let bytes = sample_tx().encode();
        assert_eq!(
            Transaction::decode(&bytes[..bytes.len() - 1]).unwrap_err(),
            CodecError::Truncated
        );
        let mut extra = bytes.clone();
        extra.push(0x80);
        assert_eq!(
            Transaction::decode(&extra).unwrap_err(),
            CodecError::TrailingBytes
        );
    }

    #[test]
    fn decode_rejects_missing_signature_field() {
        // Nine fields: the signature slot is missing.
        let bytes = [0xc9, 0x80, 0x80, 0x80, 0xc0, 0x80, 0x80, 0x80, 0x80, 0xc0];
        assert!(matches!(
            Transaction::decode(&bytes),
            Err(CodecError::MalformedFraming(_))
        ));
    }

    #[test]
    fn decode_rejects_short_dependency() {
        let mut bytes = vec![0xe9, 0x80, 0x80, 0x80, 0xc0, 0x80, 0x80, 0x9f];
        bytes.extend_from_slice(&[0x11; 31]);
        bytes.extend_from_slice(&[0x80, 0xc0, 0x80]);
        assert!(matches!(
            Transaction::decode(&bytes),
            Err(CodecError::MalformedFraming(_))
        ));
    }

    #[test]
    fn display_dump_lists_fields() {
        let text = sample_tx().to_string();
        assert!(text.contains("From:\t\t\tN/A"));
        assert!(text.contains("ChainTag:\t\t88"));
        assert!(text.contains("BlockRef:\t\t1000-00000000"));
        assert!(text.contains("DependsOn:\t\tnil"));
    }
}
