// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::TxHash;
use thiserror::Error;

use crate::bridge::TransferState;
use crate::chain::Network;

#[derive(Error, Debug)]
pub enum CctpError {
    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Unsupported route: {source_network} -> {destination_network}")]
    UnsupportedRoute {
        source_network: Network,
        destination_network: Network,
    },

    #[error("{contract} address is not configured for {network}")]
    MissingContract {
        network: Network,
        contract: &'static str,
    },

    #[error("Destination chain client is required to {operation}")]
    MissingDestinationClient { operation: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid {network} address {address:?}: {reason}")]
    InvalidAddress {
        network: Network,
        address: String,
        reason: String,
    },

    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid message hash {0:?}: expected 0x followed by 64 hex characters")]
    InvalidMessageHash(String),

    #[error("Invalid attestation: {0}")]
    InvalidAttestation(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Transfer cannot move from {from} to {to}")]
    InvalidStateTransition {
        from: TransferState,
        to: TransferState,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Attestation service returned HTTP {status}: {body}")]
    AttestationService { status: u16, body: String },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: TxHash },

    #[error("Transaction {0} not found")]
    TransactionNotFound(TxHash),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Attestation not available after {attempts} attempts")]
    AttestationTimeout { attempts: u32 },

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse classification of a [`CctpError`], for callers that route failures
/// (retry, alert, reject input) without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transfer was set up wrong: unknown network, route or contract.
    Configuration,
    /// Caller-supplied input was rejected before any remote call.
    Validation,
    /// A chain RPC or the attestation service failed or refused the request.
    Remote,
    /// On-chain data did not have the shape the protocol guarantees.
    Protocol,
    /// Attestation polling ran out of attempts.
    Timeout,
    /// Local decoding of JSON, hex or URLs failed.
    Decode,
}

impl CctpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedNetwork(_)
            | Self::UnsupportedRoute { .. }
            | Self::MissingContract { .. }
            | Self::MissingDestinationClient { .. }
            | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::InvalidAddress { .. }
            | Self::InvalidAmount { .. }
            | Self::InvalidMessageHash(_)
            | Self::InvalidAttestation(_)
            | Self::InvalidMessage(_)
            | Self::InvalidStateTransition { .. } => ErrorKind::Validation,
            Self::Network(_)
            | Self::Rpc(_)
            | Self::Provider(_)
            | Self::AttestationService { .. }
            | Self::TransactionReverted { .. }
            | Self::TransactionNotFound(_) => ErrorKind::Remote,
            Self::ProtocolViolation(_) | Self::Abi(_) => ErrorKind::Protocol,
            Self::AttestationTimeout { .. } => ErrorKind::Timeout,
            Self::Json(_) | Self::Hex(_) | Self::Url(_) => ErrorKind::Decode,
        }
    }

    /// Short variant name, used as the `error.type` span attribute.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedNetwork(_) => "UnsupportedNetwork",
            Self::UnsupportedRoute { .. } => "UnsupportedRoute",
            Self::MissingContract { .. } => "MissingContract",
            Self::MissingDestinationClient { .. } => "MissingDestinationClient",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::InvalidAddress { .. } => "InvalidAddress",
            Self::InvalidAmount { .. } => "InvalidAmount",
            Self::InvalidMessageHash(_) => "InvalidMessageHash",
            Self::InvalidAttestation(_) => "InvalidAttestation",
            Self::InvalidMessage(_) => "InvalidMessage",
            Self::InvalidStateTransition { .. } => "InvalidStateTransition",
            Self::Network(_) => "Network",
            Self::Rpc(_) => "Rpc",
            Self::Provider(_) => "Provider",
            Self::AttestationService { .. } => "AttestationService",
            Self::TransactionReverted { .. } => "TransactionReverted",
            Self::TransactionNotFound(_) => "TransactionNotFound",
            Self::ProtocolViolation(_) => "ProtocolViolation",
            Self::AttestationTimeout { .. } => "AttestationTimeout",
            Self::Abi(_) => "Abi",
            Self::Json(_) => "Json",
            Self::Hex(_) => "Hex",
            Self::Url(_) => "Url",
        }
    }
}

pub type Result<T> = std::result::Result<T, CctpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_distinct_from_configuration_errors() {
        let bad_format = CctpError::InvalidAddress {
            network: Network::Ethereum,
            address: "0x12".to_string(),
            reason: "expected 40 hex characters".to_string(),
        };
        let unknown = CctpError::UnsupportedNetwork("dogechain".to_string());

        assert_eq!(bad_format.kind(), ErrorKind::Validation);
        assert_eq!(unknown.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_error_messages() {
        let err = CctpError::UnsupportedRoute {
            source_network: Network::Ethereum,
            destination_network: Network::BaseSepolia,
        };
        insta::assert_snapshot!(err, @"Unsupported route: ethereum -> base-sepolia");

        let err = CctpError::MissingContract {
            network: Network::Solana,
            contract: "TokenMessenger",
        };
        insta::assert_snapshot!(err, @"TokenMessenger address is not configured for solana");

        let err = CctpError::AttestationTimeout { attempts: 2 };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.error_type(), "AttestationTimeout");
    }
}
