//! # Protocol Configuration & Constants
//!
//! Every magic number the transaction layer depends on lives here. Most of
//! these are consensus-relevant: changing a length or the gas price divisor
//! changes what bytes get hashed and signed, which is a hard fork.

// ---------------------------------------------------------------------------
// Identifier Widths
// ---------------------------------------------------------------------------

/// Length of an account address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a general-purpose hash (transaction IDs, block IDs) in bytes.
pub const HASH_LENGTH: usize = 32;

/// Length of the packed block reference in bytes.
pub const BLOCK_REF_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Recoverable secp256k1 signature: `r(32) || s(32) || v(1)`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Secret key length in bytes.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Uncompressed SEC1 public key length (`0x04 || x || y`).
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

// ---------------------------------------------------------------------------
// Token Selectors
// ---------------------------------------------------------------------------

/// Wire value of the gas settlement token.
pub const METER_TOKEN: u8 = 0;

/// Wire value of the governance token.
pub const METER_GOV_TOKEN: u8 = 1;

// ---------------------------------------------------------------------------
// Fee & Transaction Defaults
// ---------------------------------------------------------------------------

/// Divisor in `gas_price = base + base * coef / 255`.
pub const GAS_PRICE_COEF_DIVISOR: u8 = u8::MAX;

/// Gas consumed by a plain value transfer clause.
pub const TRANSFER_GAS: u64 = 21_000;

/// Default number of blocks a transaction stays valid after its block ref.
pub const DEFAULT_EXPIRATION: u32 = 100;

/// Chain tag of the public test network. Chain tags differ across chains.
pub const DEFAULT_CHAIN_TAG: u8 = 88;

// ---------------------------------------------------------------------------
// RLP Framing
// ---------------------------------------------------------------------------

/// First header byte of a short string.
pub const RLP_STRING_OFFSET: u8 = 0x80;

/// First header byte of a short list.
pub const RLP_LIST_OFFSET: u8 = 0xc0;

/// Longest payload that still uses the single-byte header form.
pub const RLP_SHORT_PAYLOAD_MAX: usize = 55;

/// Deepest list nesting accepted inside opaque reserved items.
pub const RLP_MAX_DEPTH: usize = 64;

/// Crate version of the protocol library, reported by the CLI.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_selectors_are_distinct() {
        assert_ne!(METER_TOKEN, METER_GOV_TOKEN);
    }

    #[test]
    fn rlp_offsets_leave_room_for_long_form() {
        assert_eq!(RLP_STRING_OFFSET as usize + RLP_SHORT_PAYLOAD_MAX, 0xb7);
        assert_eq!(RLP_LIST_OFFSET as usize + RLP_SHORT_PAYLOAD_MAX, 0xf7);
    }

    #[test]
    fn crypto_parameter_sizes() {
        assert_eq!(ADDRESS_LENGTH, 20);
        assert_eq!(HASH_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 65);
        assert_eq!(PRIVATE_KEY_LENGTH, 32);
        assert_eq!(BLOCK_REF_LENGTH, 8);
    }

    #[test]
    fn gas_price_divisor_is_u8_max() {
        assert_eq!(GAS_PRICE_COEF_DIVISOR, 255);
    }
}
