// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Network registry: identifiers, contract tables and routes.

pub mod addresses;
mod network;
mod routes;

pub use addresses::{message_transmitter_address, token_address, token_messenger_address, Token};
pub use network::{Environment, Network, NetworkFamily};
pub use routes::{
    cctp_networks, is_route_supported, is_route_supported_by_id, supported_routes, ChainRoute,
};
