// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 contract bindings.
//!
//! The wrappers hold only a contract address. They build
//! [`TransactionRequest`](alloy_rpc_types::TransactionRequest)s and decode
//! receipt logs; submission goes through a [`ChainClient`](crate::ChainClient).

pub mod erc20;
pub mod message_transmitter;
pub mod token_messenger;

pub use erc20::Erc20Contract;
pub use message_transmitter::{MessageTransmitterContract, ReceivedMessage};
pub use token_messenger::{BurnRequest, DepositForBurnEvent, TokenMessengerContract};
