// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 contract and token addresses.
//!
//! Addresses are kept as `(Network, Address)` tables rather than one lookup
//! per contract so that the supported-route set can be derived from whichever
//! networks appear in both contract tables.
//!
//! Sources:
//! - <https://developers.circle.com/stablecoins/evm-smart-contracts>
//! - <https://developers.circle.com/stablecoins/usdc-on-main-networks>
//! - <https://developers.circle.com/stablecoins/usdc-on-test-networks>

use alloy_primitives::{address, Address};

use super::Network;

// TokenMessenger

/// <https://etherscan.io/address/0xBd3fa81B58Ba92a82136038B25aDec7066af3155>
pub const ETHEREUM_TOKEN_MESSENGER: Address = address!("bd3fa81b58ba92a82136038b25adec7066af3155");

/// <https://snowtrace.io/address/0x6b25532e1060ce10cc3b0a99e5683b91bfde6982>
pub const AVALANCHE_TOKEN_MESSENGER: Address = address!("6b25532e1060ce10cc3b0a99e5683b91bfde6982");

/// <https://optimistic.etherscan.io/address/0x2B4069517957735bE00ceE0fadAE88a26365528f>
pub const OPTIMISM_TOKEN_MESSENGER: Address = address!("2B4069517957735bE00ceE0fadAE88a26365528f");

/// <https://arbiscan.io/address/0x19330d10D9Cc8751218eaf51E8885D058642E08A>
pub const ARBITRUM_TOKEN_MESSENGER: Address = address!("19330d10D9Cc8751218eaf51E8885D058642E08A");

/// <https://basescan.org/address/0x1682Ae6375C4E4A97e4B583BC394c861A46D8962>
pub const BASE_TOKEN_MESSENGER: Address = address!("1682ae6375c4e4a97e4b583bc394c861a46d8962");

/// <https://polygonscan.com/address/0x9daF8c91AEFAE50b9c0E69629D3F6Ca40cA3B3FE>
pub const POLYGON_TOKEN_MESSENGER: Address = address!("9daF8c91AEFAE50b9c0E69629D3F6Ca40cA3B3FE");

/// <https://uniscan.xyz/address/0x4e744b28E787c3aD0e810eD65A24461D4ac5a762>
pub const UNICHAIN_TOKEN_MESSENGER: Address = address!("4e744b28E787c3aD0e810eD65A24461D4ac5a762");

/// Shared by Sepolia, OP Sepolia, Arbitrum Sepolia, Base Sepolia and Amoy.
pub const TESTNET_TOKEN_MESSENGER: Address = address!("9f3B8679c73C2Fef8b59B4f3444d4e156fb70AA5");

/// <https://testnet.snowtrace.io/address/0xeb08f243E5d3FCFF26A9E38Ae5520A669f4019d0>
pub const AVALANCHE_FUJI_TOKEN_MESSENGER: Address =
    address!("eb08f243E5d3FCFF26A9E38Ae5520A669f4019d0");

// MessageTransmitter

/// <https://etherscan.io/address/0x0a992d191DEeC32aFe36203Ad87D7d289a738F81>
pub const ETHEREUM_MESSAGE_TRANSMITTER: Address =
    address!("0a992d191DEeC32aFe36203Ad87D7d289a738F81");

/// <https://snowtrace.io/address/0x8186359af5f57fbb40c6b14a588d2a59c0c29880>
pub const AVALANCHE_MESSAGE_TRANSMITTER: Address =
    address!("8186359af5f57fbb40c6b14a588d2a59c0c29880");

/// <https://optimistic.etherscan.io/address/0x4D41f22c5a0e5c74090899E5a8Fb597a8842b3e8>
pub const OPTIMISM_MESSAGE_TRANSMITTER: Address =
    address!("4D41f22c5a0e5c74090899E5a8Fb597a8842b3e8");

/// <https://arbiscan.io/address/0xC30362313FBBA5cf9163F0bb16a0e01f01a896ca>
pub const ARBITRUM_MESSAGE_TRANSMITTER: Address =
    address!("c30362313fbba5cf9163f0bb16a0e01f01a896ca");

/// <https://basescan.org/address/0xAD09780d193884d503182aD4588450C416D6F9D4>
pub const BASE_MESSAGE_TRANSMITTER: Address = address!("ad09780d193884d503182ad4588450c416d6f9d4");

/// <https://polygonscan.com/address/0xF3be9355363857F3e001be68856A2f96b4C39Ba9>
pub const POLYGON_MESSAGE_TRANSMITTER: Address =
    address!("F3be9355363857F3e001be68856A2f96b4C39Ba9");

/// <https://uniscan.xyz/address/0x353bE9E2E38AB1D19104534e4edC21c643Df86f4>
pub const UNICHAIN_MESSAGE_TRANSMITTER: Address =
    address!("353bE9E2E38AB1D19104534e4edC21c643Df86f4");

/// Shared by Sepolia, OP Sepolia, Base Sepolia and Amoy.
pub const TESTNET_MESSAGE_TRANSMITTER: Address =
    address!("7865fAfC2db2093669d92c0F33AeEF291086BEFD");

/// <https://sepolia.arbiscan.io/address/0xacf1ceef35caac005e15888ddb8a3515c41b4872>
pub const ARBITRUM_SEPOLIA_MESSAGE_TRANSMITTER: Address =
    address!("acf1ceef35caac005e15888ddb8a3515c41b4872");

/// <https://testnet.snowtrace.io/address/0xa9fB1b3009DCb79E2fe346c16a604B8Fa8aE0a79>
pub const AVALANCHE_FUJI_MESSAGE_TRANSMITTER: Address =
    address!("a9fB1b3009DCb79E2fe346c16a604B8Fa8aE0a79");

pub(crate) const TOKEN_MESSENGERS: &[(Network, Address)] = &[
    (Network::Ethereum, ETHEREUM_TOKEN_MESSENGER),
    (Network::Avalanche, AVALANCHE_TOKEN_MESSENGER),
    (Network::Optimism, OPTIMISM_TOKEN_MESSENGER),
    (Network::Arbitrum, ARBITRUM_TOKEN_MESSENGER),
    (Network::Base, BASE_TOKEN_MESSENGER),
    (Network::Polygon, POLYGON_TOKEN_MESSENGER),
    (Network::Unichain, UNICHAIN_TOKEN_MESSENGER),
    (Network::EthereumSepolia, TESTNET_TOKEN_MESSENGER),
    (Network::AvalancheFuji, AVALANCHE_FUJI_TOKEN_MESSENGER),
    (Network::OptimismSepolia, TESTNET_TOKEN_MESSENGER),
    (Network::ArbitrumSepolia, TESTNET_TOKEN_MESSENGER),
    (Network::BaseSepolia, TESTNET_TOKEN_MESSENGER),
    (Network::PolygonAmoy, TESTNET_TOKEN_MESSENGER),
];

pub(crate) const MESSAGE_TRANSMITTERS: &[(Network, Address)] = &[
    (Network::Ethereum, ETHEREUM_MESSAGE_TRANSMITTER),
    (Network::Avalanche, AVALANCHE_MESSAGE_TRANSMITTER),
    (Network::Optimism, OPTIMISM_MESSAGE_TRANSMITTER),
    (Network::Arbitrum, ARBITRUM_MESSAGE_TRANSMITTER),
    (Network::Base, BASE_MESSAGE_TRANSMITTER),
    (Network::Polygon, POLYGON_MESSAGE_TRANSMITTER),
    (Network::Unichain, UNICHAIN_MESSAGE_TRANSMITTER),
    (Network::EthereumSepolia, TESTNET_MESSAGE_TRANSMITTER),
    (Network::AvalancheFuji, AVALANCHE_FUJI_MESSAGE_TRANSMITTER),
    (Network::OptimismSepolia, TESTNET_MESSAGE_TRANSMITTER),
    (Network::ArbitrumSepolia, ARBITRUM_SEPOLIA_MESSAGE_TRANSMITTER),
    (Network::BaseSepolia, TESTNET_MESSAGE_TRANSMITTER),
    (Network::PolygonAmoy, TESTNET_MESSAGE_TRANSMITTER),
];

const USDC: &[(Network, Address)] = &[
    (Network::Ethereum, address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")),
    (Network::Avalanche, address!("B97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E")),
    (Network::Optimism, address!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85")),
    (Network::Arbitrum, address!("af88d065e77c8cC2239327C5EDb3A432268e5831")),
    (Network::Base, address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")),
    (Network::Polygon, address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359")),
    (Network::Unichain, address!("078D782b760474a361dDA0AF3839290b0EF57AD6")),
    (Network::EthereumSepolia, address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238")),
    (Network::AvalancheFuji, address!("5425890298aed601595a70AB815c96711a31Bc65")),
    (Network::OptimismSepolia, address!("5fd84259d66Cd46123540766Be93DFE6D43130D7")),
    (Network::ArbitrumSepolia, address!("75faf114eafb1BDbe2F0316DF893fd58CE46AA4d")),
    (Network::BaseSepolia, address!("036CbD53842c5426634e7929541eC2318f3dCF7e")),
    (Network::PolygonAmoy, address!("41E94Eb019C0762f9Bfcf9Fb1E58725BfB0e7582")),
];

const EURC: &[(Network, Address)] = &[
    (Network::Ethereum, address!("1aBaEA1f7C830bD89Acc67eC4af516284b1bC33c")),
    (Network::Avalanche, address!("C891EB4cbdEFf6e073e859e987815Ed1505c2ACD")),
    (Network::Base, address!("60a3E35Cc302bFA44Cb288Bc5a4F316Fdb1adb42")),
    (Network::EthereumSepolia, address!("08210F9170F89Ab7658F0B5E3fF39b0E03C594D4")),
    (Network::AvalancheFuji, address!("5E44db7996c682E92a960b65AC713a54AD815c6B")),
    (Network::BaseSepolia, address!("808456652fdb597867f38412077A9182bf77359F")),
];

/// Circle stablecoins whose contracts are tracked per network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Usdc,
    Eurc,
}

impl Token {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usdc => "USDC",
            Self::Eurc => "EURC",
        }
    }

    /// Both Circle stablecoins use 6 decimals on every EVM network.
    pub const fn decimals(self) -> u8 {
        6
    }

    fn table(self) -> &'static [(Network, Address)] {
        match self {
            Self::Usdc => USDC,
            Self::Eurc => EURC,
        }
    }
}

fn lookup(table: &[(Network, Address)], network: Network) -> Option<Address> {
    table
        .iter()
        .find(|(entry, _)| *entry == network)
        .map(|(_, address)| *address)
}

pub fn token_messenger_address(network: Network) -> Option<Address> {
    lookup(TOKEN_MESSENGERS, network)
}

pub fn message_transmitter_address(network: Network) -> Option<Address> {
    lookup(MESSAGE_TRANSMITTERS, network)
}

pub fn token_address(network: Network, token: Token) -> Option<Address> {
    lookup(token.table(), network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_tables_only_list_evm_networks_once() {
        for table in [TOKEN_MESSENGERS, MESSAGE_TRANSMITTERS, USDC, EURC] {
            for (i, (network, _)) in table.iter().enumerate() {
                assert!(network.is_evm(), "{network} is not EVM");
                assert!(
                    !table[i + 1..].iter().any(|(other, _)| other == network),
                    "{network} listed twice"
                );
            }
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(
            token_messenger_address(Network::Base),
            Some(BASE_TOKEN_MESSENGER)
        );
        assert_eq!(
            message_transmitter_address(Network::ArbitrumSepolia),
            Some(ARBITRUM_SEPOLIA_MESSAGE_TRANSMITTER)
        );
        assert_eq!(token_messenger_address(Network::Solana), None);
        assert_eq!(
            token_address(Network::Ethereum, Token::Usdc),
            Some(address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"))
        );
        assert_eq!(token_address(Network::Polygon, Token::Eurc), None);
    }

    #[test]
    fn test_every_contract_network_has_usdc() {
        for (network, _) in TOKEN_MESSENGERS {
            assert!(token_address(*network, Token::Usdc).is_some(), "{network}");
        }
    }
}
