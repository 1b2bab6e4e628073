// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 domain identifiers.
//!
//! Every chain that Circle attests for has a numeric domain. Domains are shared
//! between a mainnet and its testnets, so the domain alone does not pick an
//! environment.
//!
//! Reference: <https://developers.circle.com/stablecoins/supported-domains>

use std::fmt;

use crate::error::CctpError;

/// CCTP v1 domain.
///
/// ```rust
/// use cctp_transfer::DomainId;
///
/// assert_eq!(DomainId::Noble.as_u32(), 4);
/// assert_eq!(DomainId::from_u32(6), Some(DomainId::Base));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DomainId {
    Ethereum = 0,
    Avalanche = 1,
    Optimism = 2,
    Arbitrum = 3,
    Noble = 4,
    Solana = 5,
    Base = 6,
    Polygon = 7,
    Sui = 8,
    Aptos = 9,
    Unichain = 10,
}

impl DomainId {
    pub const ALL: [DomainId; 11] = [
        Self::Ethereum,
        Self::Avalanche,
        Self::Optimism,
        Self::Arbitrum,
        Self::Noble,
        Self::Solana,
        Self::Base,
        Self::Polygon,
        Self::Sui,
        Self::Aptos,
        Self::Unichain,
    ];

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Looks up a domain by its numeric value. Unknown values return `None`.
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.as_u32() == value)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Avalanche => "Avalanche",
            Self::Optimism => "OP Mainnet",
            Self::Arbitrum => "Arbitrum",
            Self::Noble => "Noble",
            Self::Solana => "Solana",
            Self::Base => "Base",
            Self::Polygon => "Polygon PoS",
            Self::Sui => "Sui",
            Self::Aptos => "Aptos",
            Self::Unichain => "Unichain",
        }
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

impl From<DomainId> for u32 {
    fn from(domain: DomainId) -> Self {
        domain.as_u32()
    }
}

impl TryFrom<u32> for DomainId {
    type Error = CctpError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or_else(|| CctpError::UnsupportedNetwork(format!("domain {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Some(DomainId::Ethereum))]
    #[case(4, Some(DomainId::Noble))]
    #[case(5, Some(DomainId::Solana))]
    #[case(10, Some(DomainId::Unichain))]
    #[case(11, None)]
    #[case(u32::MAX, None)]
    fn test_from_u32(#[case] value: u32, #[case] expected: Option<DomainId>) {
        assert_eq!(DomainId::from_u32(value), expected);
    }

    #[test]
    fn test_numeric_round_trip_for_every_domain() {
        for domain in DomainId::ALL {
            assert_eq!(DomainId::try_from(u32::from(domain)).unwrap(), domain);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(DomainId::Optimism.to_string(), "OP Mainnet (2)");
    }

    #[test]
    fn test_unknown_domain_is_an_error() {
        let err = DomainId::try_from(42).unwrap_err();
        assert!(matches!(err, CctpError::UnsupportedNetwork(_)));
    }
}
