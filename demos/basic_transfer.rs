// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Burn, attest and mint USDC in one run.
//!
//! Environment variables (set these in .env file):
//! - CCTP_SOURCE_NETWORK / CCTP_DESTINATION_NETWORK: e.g. ethereum-sepolia, base-sepolia
//! - CCTP_PRIVATE_KEY: wallet private key (must start with 0x)
//! - CCTP_DESTINATION_RPC_URL: required here, the mint needs a destination client
//! - CCTP_AMOUNT: USDC to send (default 1)
//! - CCTP_RECIPIENT: destination address (default: the signer)
//! - CCTP_RECORD_PATH: where progress is saved (default transfer-record.json)
//!
//! If the run is interrupted, pick it up again with the `resume_transfer`
//! example.
//!
//! Run with: `cargo run --example basic_transfer`

use cctp_transfer::{CctpError, ChainClient, Token, TransferConfig, TransferRecord, TransferState};
use tracing_subscriber::EnvFilter;

fn save(path: &str, record: &TransferRecord) -> Result<(), CctpError> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)
        .map_err(|e| CctpError::InvalidConfig(format!("cannot write {path}: {e}")))
}

#[tokio::main]
async fn main() -> Result<(), CctpError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TransferConfig::from_env()?;
    let amount = std::env::var("CCTP_AMOUNT").unwrap_or_else(|_| "1".to_string());
    let record_path =
        std::env::var("CCTP_RECORD_PATH").unwrap_or_else(|_| "transfer-record.json".to_string());

    println!(
        "🌉 CCTP transfer: {} → {}",
        config.source_network, config.destination_network
    );
    println!("==============================================\n");

    println!("1️⃣  Connecting...");
    let transfer = config.connect().await?;
    let signer = transfer.source_client().signer_address();
    let recipient = std::env::var("CCTP_RECIPIENT").unwrap_or_else(|_| signer.to_string());
    println!("   Wallet: {signer}");
    println!("   Recipient: {recipient}");
    println!(
        "   USDC balance: {}\n",
        transfer.source_balance(Token::Usdc).await?
    );

    println!("2️⃣  Burning {amount} USDC...");
    let burn = transfer.initiate_transfer(&amount, &recipient, None).await?;
    println!("   ✅ Burn TX: {}", burn.source_chain_tx_hash);
    println!("   Nonce: {}", burn.nonce);
    println!("   Message Hash: {}", burn.message_hash);

    let mut record = TransferRecord::burned(burn);
    save(&record_path, &record)?;
    println!("   Saved progress to {record_path}\n");

    let status = transfer
        .get_transfer_status(record.result.message_hash)
        .await?;
    if let Some(wait) = status.estimated_wait {
        println!(
            "3️⃣  Waiting for attestation (usually about {} minutes)...",
            wait.as_secs() / 60
        );
    } else {
        println!("3️⃣  Attestation already available");
    }

    let state = transfer.resume_transfer(&mut record).await;
    save(&record_path, &record)?;

    match state? {
        TransferState::Completed => {
            println!("\n4️⃣  Mint Phase:");
            if let Some(mint_tx) = record.mint_tx_hash {
                println!("   ✅ Mint TX: {mint_tx}");
            }
            println!("\n🎉 Transfer complete!");
        }
        TransferState::Failed => {
            println!(
                "\n⚠️  Mint failed: {}",
                record.failure.as_deref().unwrap_or("unknown reason")
            );
        }
        other => println!("\n⏸️  Transfer stopped in state {other}"),
    }

    Ok(())
}
