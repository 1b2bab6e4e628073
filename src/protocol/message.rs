// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! CCTP v1 message format.
//!
//! A message is the payload of the source MessageTransmitter's `MessageSent`
//! event. Its keccak256 hash is the key the attestation service signs, and the
//! raw bytes are what `receiveMessage` takes on the destination.
//!
//! Reference: <https://developers.circle.com/stablecoins/message-format>

use alloy_primitives::{keccak256, Bytes, B256, U256};

use super::DomainId;
use crate::error::{CctpError, Result};

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_be_bytes(buf)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_be_bytes(buf)
}

fn read_word(bytes: &[u8], at: usize) -> B256 {
    B256::from_slice(&bytes[at..at + 32])
}

/// A decoded CCTP v1 message.
///
/// # Format
///
/// | field               | bytes |
/// |---------------------|-------|
/// | version             | 4     |
/// | sourceDomain        | 4     |
/// | destinationDomain   | 4     |
/// | nonce               | 8     |
/// | sender              | 32    |
/// | recipient           | 32    |
/// | destinationCaller   | 32    |
/// | messageBody         | rest  |
///
/// All integers are big-endian. Domains are kept as raw `u32` so that
/// messages for domains this crate does not know still decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CctpMessage {
    pub version: u32,
    pub source_domain: u32,
    pub destination_domain: u32,
    pub nonce: u64,
    /// Source TokenMessenger, as bytes32.
    pub sender: B256,
    /// Destination TokenMessenger, as bytes32.
    pub recipient: B256,
    /// Zero when anyone may call `receiveMessage`.
    pub destination_caller: B256,
    pub message_body: Bytes,
}

impl CctpMessage {
    pub const HEADER_SIZE: usize = 116;

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(CctpError::InvalidMessage(format!(
                "{} bytes is shorter than the {}-byte header",
                bytes.len(),
                Self::HEADER_SIZE
            )));
        }

        Ok(Self {
            version: read_u32(bytes, 0),
            source_domain: read_u32(bytes, 4),
            destination_domain: read_u32(bytes, 8),
            nonce: read_u64(bytes, 12),
            sender: read_word(bytes, 20),
            recipient: read_word(bytes, 52),
            destination_caller: read_word(bytes, 84),
            message_body: Bytes::copy_from_slice(&bytes[Self::HEADER_SIZE..]),
        })
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::HEADER_SIZE + self.message_body.len());
        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(&self.source_domain.to_be_bytes());
        bytes.extend_from_slice(&self.destination_domain.to_be_bytes());
        bytes.extend_from_slice(&self.nonce.to_be_bytes());
        bytes.extend_from_slice(self.sender.as_slice());
        bytes.extend_from_slice(self.recipient.as_slice());
        bytes.extend_from_slice(self.destination_caller.as_slice());
        bytes.extend_from_slice(&self.message_body);
        Bytes::from(bytes)
    }

    /// The attestation key: keccak256 of the encoded message.
    pub fn hash(&self) -> B256 {
        keccak256(self.encode())
    }

    pub fn source_domain_id(&self) -> Option<DomainId> {
        DomainId::from_u32(self.source_domain)
    }

    pub fn destination_domain_id(&self) -> Option<DomainId> {
        DomainId::from_u32(self.destination_domain)
    }

    /// Decodes the body as a TokenMessenger burn message.
    pub fn burn_message(&self) -> Result<BurnMessage> {
        BurnMessage::decode(&self.message_body)
    }
}

/// Body of a message sent by the TokenMessenger for `depositForBurn`.
///
/// 4-byte version followed by four 32-byte words: burn token, mint recipient,
/// amount and original sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnMessage {
    pub version: u32,
    pub burn_token: B256,
    pub mint_recipient: B256,
    pub amount: U256,
    pub message_sender: B256,
}

impl BurnMessage {
    pub const SIZE: usize = 132;

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(CctpError::InvalidMessage(format!(
                "burn message body is {} bytes, expected {}",
                bytes.len(),
                Self::SIZE
            )));
        }

        Ok(Self {
            version: read_u32(bytes, 0),
            burn_token: read_word(bytes, 4),
            mint_recipient: read_word(bytes, 36),
            amount: U256::from_be_slice(&bytes[68..100]),
            message_sender: read_word(bytes, 100),
        })
    }

    pub fn encode(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(Self::SIZE);
        bytes.extend_from_slice(&self.version.to_be_bytes());
        bytes.extend_from_slice(self.burn_token.as_slice());
        bytes.extend_from_slice(self.mint_recipient.as_slice());
        bytes.extend_from_slice(&self.amount.to_be_bytes::<32>());
        bytes.extend_from_slice(self.message_sender.as_slice());
        Bytes::from(bytes)
    }
}

/// Key of the destination MessageTransmitter's `usedNonces` mapping:
/// `keccak256(abi.encodePacked(uint32 sourceDomain, uint64 nonce))`.
pub fn source_and_nonce_hash(source_domain: u32, nonce: u64) -> B256 {
    let mut packed = [0u8; 12];
    packed[..4].copy_from_slice(&source_domain.to_be_bytes());
    packed[4..].copy_from_slice(&nonce.to_be_bytes());
    keccak256(packed)
}
