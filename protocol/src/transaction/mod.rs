//! # Transaction Module
//!
//! The Meter transaction model: what a transaction is, how it is built,
//! signed, and identified.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        Small value types (TokenType, BlockRef)
//! clause.rs       Clause: one recipient/value/data instruction
//! builder.rs      Transaction body, its codec, and TransactionBuilder
//! signing.rs      Signing with secp256k1 keys
//! verification.rs Signer recovery and transaction IDs
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] assembles an unsigned body.
//! 2. **Sign**: [`sign_transaction`] returns a signed copy.
//! 3. **Encode**: [`Transaction::encode`] yields the wire bytes.
//! 4. **Identify**: [`Transaction::signer`] and [`Transaction::id`] recover
//!    the sender and derive the ID from the signature.
//!
//! ## Design Decisions
//!
//! - Every value here is immutable. "Modifying" a clause or attaching a
//!   signature produces a new value.
//! - Absent recipients and dependencies are `Option`s all the way down to
//!   the wire, where absence is the empty string.
//! - Amounts are arbitrary precision (`BigUint`), so fee arithmetic cannot
//!   overflow.
//! - Validation (intrinsic gas, balance, nonce policy) belongs to the node
//!   accepting the transaction, not to this crate.

pub mod builder;
pub mod clause;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use clause::Clause;
pub use signing::sign_transaction;
pub use types::{BlockRef, TokenType, UnknownTokenError};
pub use verification::TransactionError;
