// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Supported networks and their static metadata.
//!
//! A [`Network`] is identified by a stable kebab-case string (`"ethereum"`,
//! `"base-sepolia"`, `"solana"`). Only EVM networks can burn or mint through
//! this crate, but every network CCTP can deliver to is listed so that
//! destination addresses can be validated and canonicalised.

use std::{fmt, str::FromStr, time::Duration};

use alloy_chains::NamedChain;
use serde::{Deserialize, Serialize};

use crate::error::CctpError;
use crate::protocol::DomainId;

/// Address and execution family of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkFamily {
    Evm,
    Solana,
    Stellar,
    Near,
    Cosmos,
    Hedera,
}

/// Mainnets only route to mainnets and testnets only to testnets. The
/// attestation service is also selected by environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Ethereum,
    EthereumSepolia,
    Avalanche,
    AvalancheFuji,
    Optimism,
    OptimismSepolia,
    Arbitrum,
    ArbitrumSepolia,
    Base,
    BaseSepolia,
    Polygon,
    PolygonAmoy,
    Unichain,
    Solana,
    SolanaDevnet,
    Noble,
    NobleTestnet,
    Stellar,
    StellarTestnet,
    Near,
    NearTestnet,
    Hedera,
    HederaTestnet,
}

impl Network {
    pub const ALL: [Network; 23] = [
        Self::Ethereum,
        Self::EthereumSepolia,
        Self::Avalanche,
        Self::AvalancheFuji,
        Self::Optimism,
        Self::OptimismSepolia,
        Self::Arbitrum,
        Self::ArbitrumSepolia,
        Self::Base,
        Self::BaseSepolia,
        Self::Polygon,
        Self::PolygonAmoy,
        Self::Unichain,
        Self::Solana,
        Self::SolanaDevnet,
        Self::Noble,
        Self::NobleTestnet,
        Self::Stellar,
        Self::StellarTestnet,
        Self::Near,
        Self::NearTestnet,
        Self::Hedera,
        Self::HederaTestnet,
    ];

    /// Stable string identifier, the inverse of [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::EthereumSepolia => "ethereum-sepolia",
            Self::Avalanche => "avalanche",
            Self::AvalancheFuji => "avalanche-fuji",
            Self::Optimism => "optimism",
            Self::OptimismSepolia => "optimism-sepolia",
            Self::Arbitrum => "arbitrum",
            Self::ArbitrumSepolia => "arbitrum-sepolia",
            Self::Base => "base",
            Self::BaseSepolia => "base-sepolia",
            Self::Polygon => "polygon",
            Self::PolygonAmoy => "polygon-amoy",
            Self::Unichain => "unichain",
            Self::Solana => "solana",
            Self::SolanaDevnet => "solana-devnet",
            Self::Noble => "noble",
            Self::NobleTestnet => "noble-testnet",
            Self::Stellar => "stellar",
            Self::StellarTestnet => "stellar-testnet",
            Self::Near => "near",
            Self::NearTestnet => "near-testnet",
            Self::Hedera => "hedera",
            Self::HederaTestnet => "hedera-testnet",
        }
    }

    pub const fn family(self) -> NetworkFamily {
        use Network::*;

        match self {
            Solana | SolanaDevnet => NetworkFamily::Solana,
            Noble | NobleTestnet => NetworkFamily::Cosmos,
            Stellar | StellarTestnet => NetworkFamily::Stellar,
            Near | NearTestnet => NetworkFamily::Near,
            Hedera | HederaTestnet => NetworkFamily::Hedera,
            _ => NetworkFamily::Evm,
        }
    }

    pub const fn environment(self) -> Environment {
        use Network::*;

        match self {
            EthereumSepolia | AvalancheFuji | OptimismSepolia | ArbitrumSepolia | BaseSepolia
            | PolygonAmoy | SolanaDevnet | NobleTestnet | StellarTestnet | NearTestnet
            | HederaTestnet => Environment::Testnet,
            _ => Environment::Mainnet,
        }
    }

    #[inline]
    pub const fn is_testnet(self) -> bool {
        matches!(self.environment(), Environment::Testnet)
    }

    #[inline]
    pub const fn is_evm(self) -> bool {
        matches!(self.family(), NetworkFamily::Evm)
    }

    /// The alloy chain for EVM networks.
    pub const fn named_chain(self) -> Option<NamedChain> {
        use Network::*;

        let chain = match self {
            Ethereum => NamedChain::Mainnet,
            EthereumSepolia => NamedChain::Sepolia,
            Avalanche => NamedChain::Avalanche,
            AvalancheFuji => NamedChain::AvalancheFuji,
            Optimism => NamedChain::Optimism,
            OptimismSepolia => NamedChain::OptimismSepolia,
            Arbitrum => NamedChain::Arbitrum,
            ArbitrumSepolia => NamedChain::ArbitrumSepolia,
            Base => NamedChain::Base,
            BaseSepolia => NamedChain::BaseSepolia,
            Polygon => NamedChain::Polygon,
            PolygonAmoy => NamedChain::PolygonAmoy,
            Unichain => NamedChain::Unichain,
            _ => return None,
        };
        Some(chain)
    }

    /// EVM chain id, used to check that an RPC endpoint serves this network.
    pub fn chain_id(self) -> Option<u64> {
        self.named_chain().map(u64::from)
    }

    /// CCTP domain, for networks Circle attests for.
    pub const fn domain_id(self) -> Option<DomainId> {
        use Network::*;

        let domain = match self {
            Ethereum | EthereumSepolia => DomainId::Ethereum,
            Avalanche | AvalancheFuji => DomainId::Avalanche,
            Optimism | OptimismSepolia => DomainId::Optimism,
            Arbitrum | ArbitrumSepolia => DomainId::Arbitrum,
            Noble | NobleTestnet => DomainId::Noble,
            Solana | SolanaDevnet => DomainId::Solana,
            Base | BaseSepolia => DomainId::Base,
            Polygon | PolygonAmoy => DomainId::Polygon,
            Unichain => DomainId::Unichain,
            Stellar | StellarTestnet | Near | NearTestnet | Hedera | HederaTestnet => {
                return None
            }
        };
        Some(domain)
    }

    /// Public RPC endpoint used when no override is configured.
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Ethereum => "https://ethereum-rpc.publicnode.com",
            Self::EthereumSepolia => "https://ethereum-sepolia-rpc.publicnode.com",
            Self::Avalanche => "https://api.avax.network/ext/bc/C/rpc",
            Self::AvalancheFuji => "https://api.avax-test.network/ext/bc/C/rpc",
            Self::Optimism => "https://mainnet.optimism.io",
            Self::OptimismSepolia => "https://sepolia.optimism.io",
            Self::Arbitrum => "https://arb1.arbitrum.io/rpc",
            Self::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            Self::Base => "https://mainnet.base.org",
            Self::BaseSepolia => "https://sepolia.base.org",
            Self::Polygon => "https://polygon-rpc.com",
            Self::PolygonAmoy => "https://rpc-amoy.polygon.technology",
            Self::Unichain => "https://mainnet.unichain.org",
            Self::Solana => "https://api.mainnet-beta.solana.com",
            Self::SolanaDevnet => "https://api.devnet.solana.com",
            Self::Noble => "https://noble-rpc.polkachu.com",
            Self::NobleTestnet => "https://noble-testnet-rpc.polkachu.com",
            Self::Stellar => "https://horizon.stellar.org",
            Self::StellarTestnet => "https://horizon-testnet.stellar.org",
            Self::Near => "https://rpc.mainnet.near.org",
            Self::NearTestnet => "https://rpc.testnet.near.org",
            Self::Hedera => "https://mainnet.hashio.io/api",
            Self::HederaTestnet => "https://testnet.hashio.io/api",
        }
    }

    /// Median time for Circle to attest a burn on this network, according to
    /// <https://developers.circle.com/stablecoins/required-block-confirmations>.
    ///
    /// A static figure, not a live estimate.
    pub const fn attestation_median(self) -> Option<Duration> {
        use Network::*;

        let secs = match self {
            Ethereum | Arbitrum | Base | Optimism | Unichain => 19 * 60,
            Avalanche => 20,
            Polygon => 8 * 60,
            EthereumSepolia => 60,
            ArbitrumSepolia | AvalancheFuji | BaseSepolia | OptimismSepolia | PolygonAmoy => 20,
            Solana | SolanaDevnet => 25,
            Noble | NobleTestnet => 20,
            Stellar | StellarTestnet | Near | NearTestnet | Hedera | HederaTestnet => {
                return None
            }
        };
        Some(Duration::from_secs(secs))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = CctpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::ALL
            .into_iter()
            .find(|network| network.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| CctpError::UnsupportedNetwork(id.to_string()))
    }
}
