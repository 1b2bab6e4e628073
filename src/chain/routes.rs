// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Source/destination pairs that a transfer may use.
//!
//! The route set is derived when asked for, never cached: a network takes
//! part only if both its TokenMessenger and its MessageTransmitter are
//! registered, and a route only joins networks of the same environment.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::addresses::{MESSAGE_TRANSMITTERS, TOKEN_MESSENGERS};
use super::Network;
use crate::error::{CctpError, Result};

/// A validated, immutable source → destination pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRoute", into = "RawRoute")]
pub struct ChainRoute {
    source: Network,
    destination: Network,
}

impl ChainRoute {
    /// Builds a route, rejecting any pair that is not supported.
    pub fn new(source: Network, destination: Network) -> Result<Self> {
        if !is_route_supported(source, destination) {
            return Err(CctpError::UnsupportedRoute {
                source_network: source,
                destination_network: destination,
            });
        }
        Ok(Self {
            source,
            destination,
        })
    }

    /// Parses both network ids, then validates the pair.
    pub fn parse(source: &str, destination: &str) -> Result<Self> {
        Self::new(Network::from_str(source)?, Network::from_str(destination)?)
    }

    #[inline]
    pub fn source(&self) -> Network {
        self.source
    }

    #[inline]
    pub fn destination(&self) -> Network {
        self.destination
    }
}

impl fmt::Display for ChainRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

#[derive(Serialize, Deserialize)]
struct RawRoute {
    source: Network,
    destination: Network,
}

impl TryFrom<RawRoute> for ChainRoute {
    type Error = CctpError;

    fn try_from(raw: RawRoute) -> Result<Self> {
        Self::new(raw.source, raw.destination)
    }
}

impl From<ChainRoute> for RawRoute {
    fn from(route: ChainRoute) -> Self {
        Self {
            source: route.source,
            destination: route.destination,
        }
    }
}

/// Networks with both CCTP contracts registered.
pub fn cctp_networks() -> Vec<Network> {
    TOKEN_MESSENGERS
        .iter()
        .map(|(network, _)| *network)
        .filter(|network| {
            MESSAGE_TRANSMITTERS
                .iter()
                .any(|(other, _)| other == network)
        })
        .collect()
}

fn compatible(source: Network, destination: Network) -> bool {
    source != destination && source.environment() == destination.environment()
}

/// Every supported route, computed from the current contract tables.
pub fn supported_routes() -> Vec<ChainRoute> {
    let networks = cctp_networks();
    networks
        .iter()
        .flat_map(|&source| {
            networks
                .iter()
                .filter(move |&&destination| compatible(source, destination))
                .map(move |&destination| ChainRoute {
                    source,
                    destination,
                })
        })
        .collect()
}

pub fn is_route_supported(source: Network, destination: Network) -> bool {
    if !compatible(source, destination) {
        return false;
    }
    let networks = cctp_networks();
    networks.contains(&source) && networks.contains(&destination)
}

/// String-keyed variant of [`is_route_supported`]. Unknown ids are simply
/// unsupported.
pub fn is_route_supported_by_id(source: &str, destination: &str) -> bool {
    match (Network::from_str(source), Network::from_str(destination)) {
        (Ok(source), Ok(destination)) => is_route_supported(source, destination),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ethereum", "avalanche", true)]
    #[case("ethereum", "ethereum", false)]
    #[case("base", "arbitrum", true)]
    #[case("base-sepolia", "ethereum-sepolia", true)]
    #[case("ethereum", "base-sepolia", false)]
    #[case("ethereum", "solana", false)]
    #[case("ethereum", "dogechain", false)]
    fn test_is_route_supported_by_id(
        #[case] source: &str,
        #[case] destination: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(is_route_supported_by_id(source, destination), expected);
    }

    #[test]
    fn test_supported_routes_excludes_self_and_cross_environment() {
        let routes = supported_routes();
        assert!(!routes.is_empty());
        for route in &routes {
            assert_ne!(route.source(), route.destination());
            assert_eq!(
                route.source().environment(),
                route.destination().environment()
            );
        }
        // 7 mainnets and 6 testnets, each fully connected within its environment.
        assert_eq!(routes.len(), 7 * 6 + 6 * 5);
    }

    #[test]
    fn test_route_construction() {
        let route = ChainRoute::new(Network::Ethereum, Network::Base).unwrap();
        assert_eq!(route.source(), Network::Ethereum);
        assert_eq!(route.destination(), Network::Base);
        assert_eq!(route.to_string(), "ethereum -> base");

        let err = ChainRoute::new(Network::Base, Network::Base).unwrap_err();
        assert!(matches!(err, CctpError::UnsupportedRoute { .. }));

        let err = ChainRoute::parse("ethereum", "dogechain").unwrap_err();
        assert!(matches!(err, CctpError::UnsupportedNetwork(_)));
    }

    #[test]
    fn test_route_deserialization_validates() {
        let route: ChainRoute =
            serde_json::from_str(r#"{"source":"avalanche","destination":"polygon"}"#).unwrap();
        assert_eq!(route.destination(), Network::Polygon);

        let result: std::result::Result<ChainRoute, _> =
            serde_json::from_str(r#"{"source":"avalanche","destination":"avalanche-fuji"}"#);
        assert!(result.is_err());
    }
}
