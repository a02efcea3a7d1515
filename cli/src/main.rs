// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Meter Transaction Tool
//!
//! Entry point for the `meter-tx` binary. Parses CLI arguments, initializes
//! logging, and runs one offline command:
//!
//! - `build`   assemble (and optionally sign) a transaction
//! - `decode`  decode raw bytes, recover the signer, print the ID
//! - `address` derive the address of a private key
//! - `version` print build version information
//!
//! Nothing here talks to a node. `build` prints the `{"raw": "0x..."}` body
//! a node's transaction endpoint accepts; sending it is up to the caller.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use meter_protocol::crypto::PrivateKey;
use meter_protocol::transaction::{sign_transaction, BlockRef, Transaction, TransactionBuilder};

use cli::{AddressArgs, BuildArgs, Commands, DecodeArgs, MeterTxCli};

/// Request body for submitting a transaction to a node.
#[derive(Debug, Serialize, Deserialize)]
struct RawTransaction {
    raw: String,
}

fn main() -> Result<()> {
    let cli = MeterTxCli::parse();

    logging::init_logging("meter_cli=info,meter_protocol=info", cli.log_format);

    match cli.command {
        Commands::Build(args) => build_transaction(args),
        Commands::Decode(args) => decode_transaction(args),
        Commands::Address(args) => print_address(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Builds the transaction described by `args`, signs it when a key is
/// given, and prints the raw envelope on stdout.
fn build_transaction(args: BuildArgs) -> Result<()> {
    let block_ref = match args.block_id {
        Some(block_id) => BlockRef::from_block_id(&block_id),
        None => BlockRef::new(args.block_number),
    };
    let nonce = args.nonce.unwrap_or_else(rand::random);

    let builder = TransactionBuilder::new()
        .chain_tag(args.chain_tag)
        .block_ref(block_ref)
        .expiration(args.expiration)
        .gas_price_coef(args.gas_price_coef)
        .gas(args.gas)
        .depends_on(args.depends_on)
        .nonce(nonce);
    let tx = args
        .clauses()?
        .into_iter()
        .fold(builder, |builder, clause| builder.clause(clause))
        .build();

    let tx = match &args.private_key {
        Some(hex_key) => {
            let key = PrivateKey::from_hex(hex_key).context("invalid --private-key")?;
            sign_transaction(&tx, &key).context("failed to sign transaction")?
        }
        None => {
            tracing::warn!("no private key given, emitting an unsigned transaction");
            tx
        }
    };

    let id = tx.id().context("failed to derive transaction id")?;
    tracing::info!(
        %id,
        size = tx.size(),
        clauses = tx.clauses().len(),
        %block_ref,
        "transaction built"
    );
    tracing::info!("\n{tx}");

    let envelope = RawTransaction {
        raw: format!("0x{}", hex::encode(tx.encode())),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).context("failed to serialize output")?
    );
    Ok(())
}

/// Decodes raw bytes and prints the transaction dump on stdout.
fn decode_transaction(args: DecodeArgs) -> Result<()> {
    let bytes = hex::decode(cli::strip_hex_prefix(args.raw.trim()))
        .context("raw transaction is not valid hex")?;
    let tx = Transaction::decode(&bytes).context("failed to decode transaction")?;

    match tx.signer() {
        Ok(Some(signer)) => tracing::info!(%signer, "signature recovered"),
        Ok(None) => tracing::info!("transaction is unsigned"),
        Err(err) => tracing::warn!(error = %err, "signature does not recover a signer"),
    }
    if tx.has_reserved_fields() {
        tracing::warn!(
            count = tx.reserved().len(),
            "transaction carries reserved fields this version does not interpret"
        );
    }
    for (index, clause) in tx.clauses().iter().enumerate() {
        if !clause.token().is_known() {
            tracing::warn!(index, token = %clause.token(), "clause uses an unknown token selector");
        }
    }

    println!("{tx}");
    Ok(())
}

fn print_address(args: AddressArgs) -> Result<()> {
    let key = PrivateKey::from_hex(&args.private_key).context("invalid --private-key")?;
    println!("{}", key.address());
    Ok(())
}

/// Prints version information for the binary and the protocol library.
fn print_version() {
    println!("meter-tx  {}", env!("CARGO_PKG_VERSION"));
    println!("protocol  {}", meter_protocol::config::PROTOCOL_VERSION);
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
