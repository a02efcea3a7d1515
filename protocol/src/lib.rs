// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Meter Protocol: Transaction Core
//!
//! What a Meter transaction is, and how it is serialized, identified, and
//! authenticated. Get one byte of the encoding wrong and a transaction
//! either gets a different on-chain ID or a signature nobody can verify,
//! so this crate is small and strict.
//!
//! ## Architecture
//!
//! - **types**: 20-byte addresses and 32-byte hashes, with hex parsing.
//! - **codec**: Canonical RLP framing. One encoding per value, strictly decoded.
//! - **crypto**: BLAKE2b-256, Keccak-256, and secp256k1 recoverable signatures.
//! - **transaction**: Clauses, the transaction body, builder, signing, IDs.
//! - **config**: Protocol constants.
//!
//! ## Scope
//!
//! No consensus, no execution, no networking, no storage. Everything here
//! is a pure computation over in-memory values, so it runs offline and is
//! safe to share across threads.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod transaction;
pub mod types;

pub use codec::CodecError;
pub use crypto::PrivateKey;
pub use transaction::{
    sign_transaction, BlockRef, Clause, TokenType, Transaction, TransactionBuilder,
    TransactionError,
};
pub use types::{Address, Hash32, ParseError};
