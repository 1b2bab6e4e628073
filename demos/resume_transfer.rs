// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Finishes an interrupted transfer.
//!
//! Pass the burn transaction hash to rebuild the transfer from its receipt,
//! or nothing to continue from the record saved by `basic_transfer`.
//!
//! Environment variables (set these in .env file):
//! - CCTP_SOURCE_NETWORK / CCTP_DESTINATION_NETWORK
//! - CCTP_PRIVATE_KEY
//! - CCTP_DESTINATION_RPC_URL
//! - CCTP_RECORD_PATH: saved record (default transfer-record.json)
//!
//! Run with: `cargo run --example resume_transfer -- [0xBURN_TX_HASH]`

use std::str::FromStr;

use alloy_primitives::TxHash;
use cctp_transfer::{CctpError, TransferConfig, TransferRecord, TransferState};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CctpError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TransferConfig::from_env()?;
    let record_path =
        std::env::var("CCTP_RECORD_PATH").unwrap_or_else(|_| "transfer-record.json".to_string());

    println!(
        "🔄 CCTP transfer recovery: {} → {}",
        config.source_network, config.destination_network
    );
    println!("==============================================\n");

    let transfer = config.connect().await?;

    let mut record = match std::env::args().nth(1) {
        Some(hash) => {
            let burn_tx = TxHash::from_str(&hash)?;
            println!("1️⃣  Rebuilding transfer from burn {burn_tx}...");
            TransferRecord::burned(transfer.recover_transfer(burn_tx).await?)
        }
        None => {
            println!("1️⃣  Loading {record_path}...");
            let json = std::fs::read_to_string(&record_path)
                .map_err(|e| CctpError::InvalidConfig(format!("cannot read {record_path}: {e}")))?;
            serde_json::from_str(&json)?
        }
    };

    println!("   State: {}", record.state);
    println!("   Nonce: {}", record.result.nonce);
    println!("   Message Hash: {}\n", record.result.message_hash);

    if record.state.is_terminal() {
        println!("✅ Nothing to do");
        return Ok(());
    }

    println!("2️⃣  Checking destination chain...");
    if transfer
        .check_nonce_used(record.result.source_domain, record.result.nonce)
        .await?
    {
        println!("   Nonce already used: this message was minted before.");
        return Ok(());
    }

    let status = transfer
        .get_transfer_status(record.result.message_hash)
        .await?;
    println!("   Attestation: {:?}\n", status.record.status);

    println!("3️⃣  Resuming...");
    let state = transfer.resume_transfer(&mut record).await;

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(&record_path, json)
        .map_err(|e| CctpError::InvalidConfig(format!("cannot write {record_path}: {e}")))?;

    match state? {
        TransferState::Completed => {
            if let Some(mint_tx) = record.mint_tx_hash {
                println!("   ✅ Mint TX: {mint_tx}");
            }
            println!("\n🎉 Transfer Recovery Complete!");
        }
        other => println!("\n⚠️  Transfer ended in state {other}"),
    }

    Ok(())
}
