//! # CLI Interface
//!
//! Defines the command-line argument structure for `meter-tx` using `clap`
//! derive. Four subcommands: `build`, `decode`, `address`, and `version`.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use std::str::FromStr;

use meter_protocol::config::{DEFAULT_CHAIN_TAG, DEFAULT_EXPIRATION, TRANSFER_GAS};
use meter_protocol::transaction::{Clause, TokenType};
use meter_protocol::types::{Address, Hash32};

use crate::logging::LogFormat;

/// Offline transaction tool for the Meter chain.
///
/// Builds, signs, and decodes transactions without touching the network.
/// Submitting the resulting bytes to a node is left to the caller.
#[derive(Parser, Debug)]
#[command(
    name = "meter-tx",
    about = "Offline Meter transaction builder and decoder",
    version,
    propagate_version = true
)]
pub struct MeterTxCli {
    /// Log output format (logs go to stderr).
    #[arg(
        long,
        global = true,
        env = "METER_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `meter-tx` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a transaction, optionally sign it, and print its raw bytes.
    Build(BuildArgs),
    /// Decode raw transaction bytes and print their contents.
    Decode(DecodeArgs),
    /// Print the address controlled by a private key.
    Address(AddressArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Chain tag of the target network.
    #[arg(long, env = "METER_CHAIN_TAG", default_value_t = DEFAULT_CHAIN_TAG)]
    pub chain_tag: u8,

    /// Height of the reference block.
    #[arg(long, default_value_t = 0)]
    pub block_number: u32,

    /// ID of the reference block. Takes precedence over `--block-number`.
    #[arg(long)]
    pub block_id: Option<Hash32>,

    /// Blocks after the reference block during which the transaction is valid.
    #[arg(long, default_value_t = DEFAULT_EXPIRATION)]
    pub expiration: u32,

    /// Gas price coefficient, 0..=255.
    #[arg(long, default_value_t = 128)]
    pub gas_price_coef: u8,

    /// Gas limit.
    #[arg(long, default_value_t = TRANSFER_GAS)]
    pub gas: u64,

    /// Sender-chosen nonce. Random when omitted.
    #[arg(long)]
    pub nonce: Option<u64>,

    /// ID of a transaction that must execute first.
    #[arg(long)]
    pub depends_on: Option<Hash32>,

    /// Clause recipient. Repeat for one clause per recipient.
    #[arg(long = "to")]
    pub to: Vec<Address>,

    /// Clause value in the token's smallest unit, matched to `--to` by position.
    #[arg(long = "value")]
    pub value: Vec<BigUint>,

    /// Clause payload as hex, matched to `--to` by position.
    #[arg(long = "data")]
    pub data: Vec<HexBytes>,

    /// Token for every clause: `meter` (MTR) or `gov` (MTRG).
    #[arg(long, default_value_t = TokenType::Meter)]
    pub token: TokenType,

    /// Hex-encoded secp256k1 private key. Unsigned output when omitted.
    #[arg(long, env = "METER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

impl BuildArgs {
    /// Pairs recipients with values and payloads. Without any `--to`, a
    /// single recipient-less clause is produced (contract creation).
    pub fn clauses(&self) -> Result<Vec<Clause>> {
        let slots = self.to.len().max(1);
        if self.value.len() > slots {
            bail!("{} --value given for {slots} clause(s)", self.value.len());
        }
        if self.data.len() > slots {
            bail!("{} --data given for {slots} clause(s)", self.data.len());
        }

        let recipients: Vec<Option<Address>> = if self.to.is_empty() {
            vec![None]
        } else {
            self.to.iter().copied().map(Some).collect()
        };

        let clauses = recipients
            .into_iter()
            .enumerate()
            .map(|(i, to)| {
                let mut clause = Clause::new(to).with_token(self.token);
                if let Some(value) = self.value.get(i) {
                    clause = clause.with_value(value.clone());
                }
                if let Some(data) = self.data.get(i) {
                    clause = clause.with_data(data.0.clone());
                }
                clause
            })
            .collect();
        Ok(clauses)
    }
}

/// Arguments for the `decode` subcommand.
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// Raw transaction bytes as hex, with or without `0x`.
    pub raw: String,
}

/// Arguments for the `address` subcommand.
#[derive(Parser, Debug)]
pub struct AddressArgs {
    /// Hex-encoded secp256k1 private key.
    #[arg(long, env = "METER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

/// Hex input with an optional `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl FromStr for HexBytes {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(strip_hex_prefix(s)).map(Self)
    }
}

pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const TO_A: &str = "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed";
    const TO_B: &str = "0x0000000000000000000000000000000000000001";

    fn build_args(extra: &[&str]) -> BuildArgs {
        let mut argv = vec!["meter-tx", "build"];
        argv.extend_from_slice(extra);
        match MeterTxCli::try_parse_from(argv).unwrap().command {
            Commands::Build(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verify_cli_structure() {
        MeterTxCli::command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let args = build_args(&[]);
        assert_eq!(args.expiration, DEFAULT_EXPIRATION);
        assert_eq!(args.gas, TRANSFER_GAS);
        assert_eq!(args.token, TokenType::Meter);
        assert!(args.block_id.is_none());
    }

    #[test]
    fn clauses_pair_by_position() {
        let args = build_args(&[
            "--to", TO_A, "--value", "2000000000000000000", "--to", TO_B, "--token", "gov",
        ]);
        let clauses = args.clauses().unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].to(), Some(Address::must_parse(TO_A)));
        assert_eq!(
            clauses[0].value(),
            &BigUint::from(2_000_000_000_000_000_000u128)
        );
        assert_eq!(clauses[1].value(), &BigUint::default());
        assert!(clauses.iter().all(|c| c.token() == TokenType::MeterGov));
    }

    #[test]
    fn no_recipient_means_contract_creation() {
        let args = build_args(&["--data", "0x6080"]);
        let clauses = args.clauses().unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].to(), None);
        assert_eq!(clauses[0].data(), &[0x60, 0x80]);
    }

    #[test]
    fn surplus_values_are_rejected() {
        let args = build_args(&["--to", TO_A, "--value", "1", "--value", "2"]);
        assert!(args.clauses().is_err());
    }

    #[test]
    fn malformed_recipient_fails_to_parse() {
        assert!(MeterTxCli::try_parse_from(["meter-tx", "build", "--to", "0x1234"]).is_err());
    }

    #[test]
    fn hex_bytes_accepts_prefix() {
        assert_eq!("0xff".parse::<HexBytes>().unwrap(), HexBytes(vec![0xff]));
        assert_eq!("ff".parse::<HexBytes>().unwrap(), HexBytes(vec![0xff]));
        assert!("0xzz".parse::<HexBytes>().is_err());
    }
}
