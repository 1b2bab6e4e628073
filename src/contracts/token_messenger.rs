// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! TokenMessenger: the contract that burns USDC on the source chain.

use alloy_primitives::{Address, Log, B256, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall, SolEvent};
use tracing::{debug, info};

use crate::error::{CctpError, Result};
use TokenMessenger::{depositForBurnCall, depositForBurnWithCallerCall, DepositForBurn};

sol! {
    interface TokenMessenger {
        event DepositForBurn(
            uint64 indexed nonce,
            address indexed burnToken,
            uint256 amount,
            address indexed depositor,
            bytes32 mintRecipient,
            uint32 destinationDomain,
            bytes32 destinationTokenMessenger,
            bytes32 destinationCaller
        );

        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken
        ) external returns (uint64 nonce);

        function depositForBurnWithCaller(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken,
            bytes32 destinationCaller
        ) external returns (uint64 nonce);
    }
}

/// Parameters of a single burn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnRequest {
    pub amount: U256,
    pub destination_domain: u32,
    pub mint_recipient: B256,
    pub burn_token: Address,
    /// Restricts who may call `receiveMessage` on the destination.
    pub destination_caller: Option<B256>,
}

/// A `DepositForBurn` event as emitted by the TokenMessenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositForBurnEvent {
    pub nonce: u64,
    pub burn_token: Address,
    pub amount: U256,
    pub depositor: Address,
    pub mint_recipient: B256,
    pub destination_domain: u32,
    pub destination_caller: B256,
}

/// Builds TokenMessenger transactions and reads its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMessengerContract {
    address: Address,
}

impl TokenMessengerContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `depositForBurn`, or `depositForBurnWithCaller` when a destination
    /// caller is set.
    pub fn deposit_for_burn_transaction(
        &self,
        from: Address,
        request: &BurnRequest,
    ) -> TransactionRequest {
        let calldata = match request.destination_caller {
            None => depositForBurnCall {
                amount: request.amount,
                destinationDomain: request.destination_domain,
                mintRecipient: request.mint_recipient,
                burnToken: request.burn_token,
            }
            .abi_encode(),
            Some(caller) => depositForBurnWithCallerCall {
                amount: request.amount,
                destinationDomain: request.destination_domain,
                mintRecipient: request.mint_recipient,
                burnToken: request.burn_token,
                destinationCaller: caller,
            }
            .abi_encode(),
        };

        info!(
            from_address = %from,
            mint_recipient = %request.mint_recipient,
            destination_domain = request.destination_domain,
            token_address = %request.burn_token,
            amount = %request.amount,
            with_caller = request.destination_caller.is_some(),
            contract_address = %self.address,
            event = "deposit_for_burn_transaction_created"
        );

        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(TransactionInput::new(calldata.into()))
    }

    /// Finds the `DepositForBurn` event this contract emitted among `logs`.
    pub fn find_deposit_for_burn(&self, logs: &[Log]) -> Result<Option<DepositForBurnEvent>> {
        let Some(log) = logs.iter().find(|log| {
            log.address == self.address
                && log.topics().first() == Some(&DepositForBurn::SIGNATURE_HASH)
        }) else {
            debug!(
                available_logs = logs.len(),
                event = "deposit_for_burn_event_not_found"
            );
            return Ok(None);
        };

        let event = DepositForBurn::decode_log_data(&log.data).map_err(CctpError::Abi)?;
        Ok(Some(DepositForBurnEvent {
            nonce: event.nonce,
            burn_token: event.burnToken,
            amount: event.amount,
            depositor: event.depositor,
            mint_recipient: event.mintRecipient,
            destination_domain: event.destinationDomain,
            destination_caller: event.destinationCaller,
        }))
    }
}
