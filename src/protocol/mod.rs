// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 wire types: domains, messages and attestations.

mod attestation;
mod domain_id;
mod message;

pub use attestation::{
    parse_attestation_hex, parse_message_hash, validate_attestation, AttestationRecord,
    AttestationResponse, AttestationSignature, AttestationState, AttestationStatus,
    SIGNATURE_LENGTH,
};
pub use domain_id::DomainId;
pub use message::{source_and_nonce_hash, BurnMessage, CctpMessage};
