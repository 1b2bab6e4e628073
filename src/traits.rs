// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! I/O seams of a transfer.
//!
//! Chain access, attestation lookups and time are injected through these
//! traits so the orchestrator can run against the fakes in
//! [`testing`](crate::testing) as well as live endpoints.
//!
//! # Example: a fake clock
//!
//! ```rust,ignore
//! use cctp_transfer::Clock;
//!
//! struct InstantClock;
//!
//! #[async_trait::async_trait]
//! impl Clock for InstantClock {
//!     async fn sleep(&self, _duration: Duration) {}
//!     fn now(&self) -> Instant { Instant::now() }
//! }
//! ```

use alloy_primitives::{Address, Bytes, Log, TxHash, B256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::protocol::AttestationResponse;

/// What a mined transaction left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub tx_hash: TxHash,
    /// Receipt status: `false` means the transaction reverted.
    pub success: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

/// Signing access to one EVM chain.
///
/// Implementations own the signing credential; the orchestrator only ever
/// sees [`signer_address`](ChainClient::signer_address).
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Reverted burns and mints
/// - Receipts missing the expected events
/// - RPC failures at each step
/// - Asserting that validation failures make no calls at all
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address that signs and pays for submitted transactions.
    fn signer_address(&self) -> Address;

    /// Signs, submits and waits for the receipt of `tx`.
    ///
    /// A mined but reverted transaction is `Ok` with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an error if submission or receipt retrieval fails.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TransactionOutcome>;

    /// Executes a read-only `eth_call` and returns the raw output.
    async fn call(&self, tx: TransactionRequest) -> Result<Bytes>;

    /// Looks up an already-mined transaction. `None` if unknown.
    async fn get_transaction_outcome(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>>;
}

/// Lookup of attestations by message hash.
///
/// A message the service does not know yet is reported as pending, not as an
/// error.
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP request fails or times out
/// - The service answers with a non-success status other than not-found
/// - The response body cannot be parsed
#[async_trait]
pub trait AttestationProvider: Send + Sync {
    async fn get_attestation(&self, message_hash: B256) -> Result<AttestationResponse>;
}

/// Sleep and time queries, so polling can be fast-forwarded in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}
