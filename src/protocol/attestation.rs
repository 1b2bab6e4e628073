// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Attestation service responses and attestation payload checks.

use std::str::FromStr;

use alloy_primitives::{hex::FromHex, Bytes, B256};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CctpError, Result};

/// Length of one attester signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Body of `GET /v1/attestations/{messageHash}`.
///
/// The service sometimes sends the string `"PENDING"` in the attestation
/// field instead of `null`; that is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    pub status: AttestationStatus,
    #[serde(default, deserialize_with = "deserialize_optional_bytes_or_pending")]
    pub attestation: Option<Bytes>,
}

impl AttestationResponse {
    /// What the service's 404 means: the message is not attested yet.
    pub fn pending() -> Self {
        Self {
            status: AttestationStatus::Pending,
            attestation: None,
        }
    }

    pub fn complete(attestation: Bytes) -> Self {
        Self {
            status: AttestationStatus::Complete,
            attestation: Some(attestation),
        }
    }
}

fn deserialize_optional_bytes_or_pending<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Bytes>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("pending") => Ok(None),
        Some(s) => Bytes::from_hex(s).map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttestationStatus {
    Complete,
    Pending,
    PendingConfirmations,
}

/// Two-state view exposed to callers: the service's `pending_confirmations`
/// is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationState {
    Pending,
    Complete,
}

/// Current attestation state of one message. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub message_hash: B256,
    pub status: AttestationState,
    pub attestation: Option<Bytes>,
}

impl AttestationRecord {
    pub fn from_response(message_hash: B256, response: AttestationResponse) -> Self {
        let status = match response.status {
            AttestationStatus::Complete => AttestationState::Complete,
            AttestationStatus::Pending | AttestationStatus::PendingConfirmations => {
                AttestationState::Pending
            }
        };
        Self {
            message_hash,
            status,
            attestation: response.attestation,
        }
    }

    /// Complete and carrying a payload. A complete status with no payload
    /// is not usable yet.
    pub fn is_complete(&self) -> bool {
        self.status == AttestationState::Complete && self.attestation.is_some()
    }
}

/// One attester's ECDSA signature inside an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationSignature {
    pub r: B256,
    pub s: B256,
    pub v: u8,
}

impl AttestationSignature {
    /// Splits a concatenated attestation into its 65-byte signatures.
    pub fn parse_all(attestation: &[u8]) -> Result<Vec<Self>> {
        check_attestation_length(attestation.len())?;
        Ok(attestation
            .chunks_exact(SIGNATURE_LENGTH)
            .map(|chunk| Self {
                r: B256::from_slice(&chunk[..32]),
                s: B256::from_slice(&chunk[32..64]),
                v: chunk[64],
            })
            .collect())
    }
}

fn check_attestation_length(len: usize) -> Result<()> {
    if len < SIGNATURE_LENGTH {
        return Err(CctpError::InvalidAttestation(format!(
            "{len} bytes is shorter than one {SIGNATURE_LENGTH}-byte signature"
        )));
    }
    if len % SIGNATURE_LENGTH != 0 {
        return Err(CctpError::InvalidAttestation(format!(
            "{len} bytes is not a whole number of {SIGNATURE_LENGTH}-byte signatures"
        )));
    }
    Ok(())
}

/// Checks a raw attestation payload before it is submitted on-chain.
pub fn validate_attestation(attestation: &[u8]) -> Result<()> {
    check_attestation_length(attestation.len())
}

/// Parses a `0x`-prefixed hex attestation, as returned by the service.
pub fn parse_attestation_hex(attestation: &str) -> Result<Bytes> {
    let Some(hex) = attestation.strip_prefix("0x") else {
        return Err(CctpError::InvalidAttestation("missing 0x prefix".into()));
    };
    if hex.len() < SIGNATURE_LENGTH * 2 {
        return Err(CctpError::InvalidAttestation(format!(
            "{} hex characters, expected at least {}",
            hex.len(),
            SIGNATURE_LENGTH * 2
        )));
    }
    let bytes = Bytes::from_hex(hex).map_err(|e| CctpError::InvalidAttestation(e.to_string()))?;
    validate_attestation(&bytes)?;
    Ok(bytes)
}

/// Parses a message hash: `0x` followed by exactly 64 hex characters.
pub fn parse_message_hash(hash: &str) -> Result<B256> {
    let well_formed = hash.len() == 66
        && hash.starts_with("0x")
        && hash[2..].bytes().all(|b| b.is_ascii_hexdigit());
    if !well_formed {
        return Err(CctpError::InvalidMessageHash(hash.to_string()));
    }
    B256::from_str(hash).map_err(|_| CctpError::InvalidMessageHash(hash.to_string()))
}
