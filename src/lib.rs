// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! # cctp-transfer
//!
//! USDC transfers over Circle's Cross-Chain Transfer Protocol (CCTP v1):
//! burn on the source chain, wait for Circle's attestation, mint on the
//! destination chain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cctp_transfer::{CctpError, TransferConfig};
//!
//! # async fn example() -> Result<(), CctpError> {
//! // CCTP_SOURCE_NETWORK, CCTP_DESTINATION_NETWORK, CCTP_PRIVATE_KEY, ...
//! let transfer = TransferConfig::from_env()?.connect().await?;
//!
//! let burn = transfer
//!     .initiate_transfer("10.5", "0x742d35Cc6634C0532925a3b844Bc9e7595f8fA0d", None)
//!     .await?;
//! let attestation = transfer.wait_for_attestation(burn.message_hash).await?;
//! let mint = transfer
//!     .complete_transfer(burn.message_bytes, attestation)
//!     .await?;
//! assert!(mint.success);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`chain`]: networks, CCTP domains, contract addresses and routes
//! - [`codec`]: address canonicalisation and decimal amounts
//! - [`protocol`]: message and attestation wire formats
//! - [`contracts`]: calldata builders and event decoders for the v1 contracts
//! - [`attestation`]: the polling loop around an [`AttestationProvider`]
//! - [`bridge`]: [`CctpTransfer`] and the transfer state machine
//! - [`providers`]: alloy, Iris and tokio implementations of the traits in
//!   [`traits`]
//! - [`testing`]: in-memory fakes for all three traits
//!
//! Everything that talks to the outside world goes through [`ChainClient`],
//! [`AttestationProvider`] or [`Clock`], so a whole transfer can run against
//! the fakes in [`testing`].

pub mod attestation;
pub mod bridge;
pub mod chain;
pub mod codec;
pub mod config;
pub mod contracts;
pub mod error;
pub mod protocol;
pub mod providers;
pub mod spans;
pub mod testing;
pub mod traits;

pub use attestation::{AttestationPoller, PollingConfig};
pub use bridge::{
    CctpTransfer, MintResult, TransferRecord, TransferResult, TransferState, TransferStatus,
};
pub use chain::{
    is_route_supported, is_route_supported_by_id, supported_routes, ChainRoute, Environment,
    Network, NetworkFamily, Token,
};
pub use codec::{
    format_units, from_canonical_form, is_valid_address, parse_units, to_canonical_form,
    validate_amount, AmountRules,
};
pub use config::{LiveTransfer, TransferConfig};
pub use error::{CctpError, ErrorKind, Result};
pub use protocol::{
    AttestationRecord, AttestationResponse, AttestationState, AttestationStatus, BurnMessage,
    CctpMessage, DomainId,
};
pub use traits::{AttestationProvider, ChainClient, Clock, TransactionOutcome};
