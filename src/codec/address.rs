// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Per-network address validation and the 32-byte canonical form used for
//! `mintRecipient` and `destinationCaller`.
//!
//! EVM and Solana addresses have an exact bytes32 encoding. The other
//! families are encoded on a best-effort basis: their text form is padded
//! into 32 bytes, which round-trips locally but is not what those chains
//! expect on the wire. [`canonical_encoding`] reports which applies.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use tracing::warn;

use crate::chain::{Network, NetworkFamily};
use crate::error::{CctpError, Result};

/// How faithfully a network's addresses map into bytes32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalEncoding {
    Exact,
    BestEffort,
}

pub fn canonical_encoding(network: Network) -> CanonicalEncoding {
    match network.family() {
        NetworkFamily::Evm | NetworkFamily::Solana => CanonicalEncoding::Exact,
        _ => CanonicalEncoding::BestEffort,
    }
}

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Returns the reason `address` is malformed for `family`, if it is.
fn shape_error(address: &str, family: NetworkFamily) -> Option<String> {
    match family {
        NetworkFamily::Evm => {
            let Some(hex) = address.strip_prefix("0x") else {
                return Some("expected 0x prefix".into());
            };
            if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Some("expected 40 hex characters after 0x".into());
            }
            None
        }
        NetworkFamily::Solana => {
            if !(32..=44).contains(&address.len()) {
                return Some("expected 32 to 44 base58 characters".into());
            }
            if !address.chars().all(|c| BASE58_ALPHABET.contains(c)) {
                return Some("contains characters outside the base58 alphabet".into());
            }
            None
        }
        NetworkFamily::Stellar => {
            let valid = address.len() == 56
                && address.starts_with('G')
                && address
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c));
            (!valid).then(|| "expected G followed by 55 base32 characters".into())
        }
        NetworkFamily::Near => near_account_error(address),
        NetworkFamily::Cosmos => {
            let Some(data) = address.strip_prefix("noble1") else {
                return Some("expected noble1 prefix".into());
            };
            if data.len() != 38 || !data.chars().all(|c| BECH32_CHARSET.contains(c)) {
                return Some("expected 38 bech32 characters after noble1".into());
            }
            None
        }
        NetworkFamily::Hedera => {
            let parts: Vec<&str> = address.split('.').collect();
            let valid = parts.len() == 3
                && parts
                    .iter()
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
            (!valid).then(|| "expected shard.realm.num".into())
        }
    }
}

fn near_account_error(account: &str) -> Option<String> {
    // Implicit accounts are the hex of an ed25519 public key.
    if account.len() == 64 && account.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')) {
        return None;
    }
    if !(2..=64).contains(&account.len()) {
        return Some("expected 2 to 64 characters".into());
    }
    let parts_ok = account.split('.').all(|part| {
        !part.is_empty()
            && part
                .split(['-', '_'])
                .all(|run| !run.is_empty() && run.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9')))
    });
    (!parts_ok).then(|| "expected lowercase alphanumeric parts separated by '.', '-' or '_'".into())
}

/// Shape check only: EVM checksums are accepted but not recomputed.
pub fn validate(address: &str, network: Network) -> bool {
    shape_error(address, network.family()).is_none()
}

/// Like [`validate`], but names the rule that failed.
pub fn check(address: &str, network: Network) -> Result<()> {
    match shape_error(address, network.family()) {
        None => Ok(()),
        Some(reason) => Err(CctpError::InvalidAddress {
            network,
            address: address.to_string(),
            reason,
        }),
    }
}

/// Validates against a network given by id.
///
/// An unknown network is an error; a malformed address is `Ok(false)`.
pub fn is_valid_address(address: &str, network_id: &str) -> Result<bool> {
    let network = Network::from_str(network_id)?;
    Ok(validate(address, network))
}

/// Encodes `address` into the bytes32 form CCTP messages carry.
pub fn to_canonical_form(address: &str, network: Network) -> Result<B256> {
    check(address, network)?;

    match network.family() {
        NetworkFamily::Evm => {
            let address = Address::from_str(address).map_err(|e| invalid(address, network, e))?;
            Ok(address.into_word())
        }
        NetworkFamily::Solana => {
            let bytes = bs58::decode(address)
                .into_vec()
                .map_err(|e| invalid(address, network, e))?;
            if bytes.len() != 32 {
                return Err(invalid(
                    address,
                    network,
                    format!("decodes to {} bytes, expected 32", bytes.len()),
                ));
            }
            Ok(B256::from_slice(&bytes))
        }
        _ => {
            let bytes = address.as_bytes();
            if bytes.len() > 32 {
                return Err(invalid(address, network, "longer than 32 bytes"));
            }
            warn!(
                network = %network,
                address = address,
                event = "best_effort_canonical_encoding"
            );
            let mut word = [0u8; 32];
            word[32 - bytes.len()..].copy_from_slice(bytes);
            Ok(B256::from(word))
        }
    }
}

/// Decodes a bytes32 value back into `network`'s address text.
pub fn from_canonical_form(word: B256, network: Network) -> Result<String> {
    let address = match network.family() {
        NetworkFamily::Evm => {
            if word[..12].iter().any(|&b| b != 0) {
                return Err(CctpError::InvalidAddress {
                    network,
                    address: word.to_string(),
                    reason: "upper 12 bytes of an EVM address must be zero".into(),
                });
            }
            format!("{:#x}", Address::from_word(word))
        }
        NetworkFamily::Solana => bs58::encode(word).into_string(),
        _ => {
            let start = word.iter().position(|&b| b != 0).unwrap_or(32);
            String::from_utf8(word[start..].to_vec()).map_err(|e| CctpError::InvalidAddress {
                network,
                address: word.to_string(),
                reason: e.to_string(),
            })?
        }
    };
    Ok(address)
}

fn invalid(address: &str, network: Network, reason: impl ToString) -> CctpError {
    CctpError::InvalidAddress {
        network,
        address: address.to_string(),
        reason: reason.to_string(),
    }
}
