// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! MessageTransmitter: emits messages on the source chain and verifies
//! attested messages on the destination chain.

use alloy_primitives::{Address, Bytes, Log, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::{debug, info};

use crate::error::{CctpError, Result};
use crate::protocol::source_and_nonce_hash;
use MessageTransmitter::{receiveMessageCall, usedNoncesCall, MessageReceived, MessageSent};

sol! {
    interface MessageTransmitter {
        event MessageSent(bytes message);

        event MessageReceived(
            address indexed caller,
            uint32 sourceDomain,
            uint64 indexed nonce,
            bytes32 sender,
            bytes messageBody
        );

        function receiveMessage(bytes message, bytes attestation) external returns (bool success);

        function usedNonces(bytes32 sourceAndNonce) external view returns (uint256);
    }
}

/// The parts of a `MessageReceived` event a caller needs to confirm a mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub source_domain: u32,
    pub nonce: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTransmitterContract {
    address: Address,
}

impl MessageTransmitterContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn receive_message_transaction(
        &self,
        from: Address,
        message: Bytes,
        attestation: Bytes,
    ) -> TransactionRequest {
        info!(
            from_address = %from,
            message_length_bytes = message.len(),
            attestation_length_bytes = attestation.len(),
            contract_address = %self.address,
            event = "receive_message_transaction_created"
        );

        let calldata = receiveMessageCall {
            message,
            attestation,
        }
        .abi_encode();

        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(TransactionInput::new(calldata.into()))
    }

    /// View call reading `usedNonces(keccak256(sourceDomain ‖ nonce))`.
    pub fn used_nonces_call(&self, source_domain: u32, nonce: u64) -> TransactionRequest {
        let calldata = usedNoncesCall {
            sourceAndNonce: source_and_nonce_hash(source_domain, nonce),
        }
        .abi_encode();

        TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::new(calldata.into()))
    }

    /// Decodes the `usedNonces` return value. Any non-zero value means used.
    pub fn decode_used_nonce(output: &[u8]) -> Result<bool> {
        let used: U256 = usedNoncesCall::abi_decode_returns(output)?;
        Ok(!used.is_zero())
    }

    /// Message bytes from the `MessageSent` event this contract emitted.
    pub fn find_message_sent(&self, logs: &[Log]) -> Result<Option<Bytes>> {
        let Some(log) = logs.iter().find(|log| {
            log.address == self.address && log.topics().first() == Some(&MessageSent::SIGNATURE_HASH)
        }) else {
            debug!(
                available_logs = logs.len(),
                event = "message_sent_event_not_found"
            );
            return Ok(None);
        };

        let event = MessageSent::decode_log_data(&log.data).map_err(CctpError::Abi)?;
        Ok(Some(event.message))
    }

    pub fn find_message_received(&self, logs: &[Log]) -> Result<Option<ReceivedMessage>> {
        let Some(log) = logs.iter().find(|log| {
            log.address == self.address
                && log.topics().first() == Some(&MessageReceived::SIGNATURE_HASH)
        }) else {
            return Ok(None);
        };

        let event = MessageReceived::decode_log_data(&log.data).map_err(CctpError::Abi)?;
        Ok(Some(ReceivedMessage {
            source_domain: event.sourceDomain,
            nonce: event.nonce,
        }))
    }
}
