// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use serde::{Deserialize, Serialize};

use crate::contracts::ReceivedMessage;
use crate::error::{CctpError, Result};
use crate::protocol::AttestationRecord;

/// Progress of a transfer: `NotStarted → Burned → Attested → Completed`.
///
/// `Failed` is reachable from every non-terminal state. Nothing moves
/// backwards and nothing leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    NotStarted,
    Burned,
    Attested,
    Completed,
    Failed,
}

impl TransferState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Burned => "burned",
            Self::Attested => "attested",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether `self → next` is one of the allowed forward steps.
    pub const fn can_transition_to(self, next: TransferState) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Burned)
                | (Self::Burned, Self::Attested)
                | (Self::Attested, Self::Completed)
                | (Self::NotStarted | Self::Burned | Self::Attested, Self::Failed)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to finish a transfer after its burn was mined.
///
/// Serialisable so a caller can persist it and complete the transfer from
/// another process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub source_chain_tx_hash: TxHash,
    /// Assigned by the source MessageTransmitter.
    pub nonce: u64,
    /// keccak256 of `message_bytes`; the attestation lookup key.
    pub message_hash: B256,
    pub message_bytes: Bytes,
    pub source_domain: u32,
    pub destination_domain: u32,
    /// Burned amount in token base units.
    pub amount: U256,
    pub burn_token: Address,
    pub mint_recipient: B256,
}

/// A transfer and how far it got. Persisting it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub result: TransferResult,
    pub state: TransferState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint_tx_hash: Option<TxHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl TransferRecord {
    /// A record for a freshly mined burn.
    pub fn burned(result: TransferResult) -> Self {
        Self {
            result,
            state: TransferState::Burned,
            attestation: None,
            mint_tx_hash: None,
            failure: None,
        }
    }

    fn advance(&mut self, next: TransferState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(CctpError::InvalidStateTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn record_attestation(&mut self, attestation: Bytes) -> Result<()> {
        self.advance(TransferState::Attested)?;
        self.attestation = Some(attestation);
        Ok(())
    }

    pub fn record_mint(&mut self, mint_tx_hash: TxHash) -> Result<()> {
        self.advance(TransferState::Completed)?;
        self.mint_tx_hash = Some(mint_tx_hash);
        Ok(())
    }

    /// Completes a record whose nonce the destination chain already marked
    /// used, when the mint that consumed it is not known.
    pub fn record_prior_mint(&mut self) -> Result<()> {
        self.advance(TransferState::Completed)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        self.advance(TransferState::Failed)?;
        self.failure = Some(reason.into());
        Ok(())
    }
}

/// Outcome of `receiveMessage` on the destination chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintResult {
    pub tx_hash: TxHash,
    /// Receipt status. A replayed message shows up here as `false`.
    pub success: bool,
    /// The decoded `MessageReceived` event, if the receipt carries one.
    pub received: Option<ReceivedMessage>,
}

/// Attestation state plus a rough idea of how much longer it will take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferStatus {
    pub record: AttestationRecord,
    /// The source network's typical attestation time while pending.
    pub estimated_wait: Option<Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result() -> TransferResult {
        TransferResult {
            source_chain_tx_hash: TxHash::repeat_byte(1),
            nonce: 7,
            message_hash: B256::repeat_byte(2),
            message_bytes: Bytes::from(vec![0u8; 248]),
            source_domain: 0,
            destination_domain: 6,
            amount: U256::from(1_000_000u64),
            burn_token: Address::repeat_byte(3),
            mint_recipient: B256::repeat_byte(4),
        }
    }

    #[rstest]
    #[case(TransferState::NotStarted, TransferState::Burned, true)]
    #[case(TransferState::Burned, TransferState::Attested, true)]
    #[case(TransferState::Attested, TransferState::Completed, true)]
    #[case(TransferState::Burned, TransferState::Failed, true)]
    #[case(TransferState::Completed, TransferState::Failed, false)]
    #[case(TransferState::Failed, TransferState::Failed, false)]
    #[case(TransferState::Burned, TransferState::Completed, false)]
    #[case(TransferState::Attested, TransferState::Burned, false)]
    #[case(TransferState::Failed, TransferState::Burned, false)]
    #[case(TransferState::Burned, TransferState::Burned, false)]
    fn test_transitions(
        #[case] from: TransferState,
        #[case] to: TransferState,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[test]
    fn test_record_walks_forward() {
        let mut record = TransferRecord::burned(result());

        record.record_attestation(Bytes::from(vec![1u8; 65])).unwrap();
        assert_eq!(record.state, TransferState::Attested);

        record.record_mint(TxHash::repeat_byte(9)).unwrap();
        assert_eq!(record.state, TransferState::Completed);
        assert!(record.state.is_terminal());
    }

    #[test]
    fn test_record_rejects_skipping_attestation() {
        let mut record = TransferRecord::burned(result());

        let err = record.record_mint(TxHash::repeat_byte(9)).unwrap_err();

        insta::assert_snapshot!(err, @"Transfer cannot move from burned to completed");
        assert_eq!(record.state, TransferState::Burned);
        assert_eq!(record.mint_tx_hash, None);
    }

    #[test]
    fn test_terminal_records_cannot_fail() {
        let mut completed = TransferRecord::burned(result());
        completed.record_attestation(Bytes::from(vec![1u8; 65])).unwrap();
        completed.record_mint(TxHash::repeat_byte(9)).unwrap();

        let err = completed.fail("late error").unwrap_err();
        assert!(matches!(
            err,
            CctpError::InvalidStateTransition {
                from: TransferState::Completed,
                to: TransferState::Failed
            }
        ));
        assert_eq!(completed.state, TransferState::Completed);
        assert_eq!(completed.failure, None);

        let mut failed = TransferRecord::burned(result());
        failed.fail("first").unwrap();
        assert!(failed.fail("second").is_err());
        assert_eq!(failed.failure.as_deref(), Some("first"));
    }

    #[test]
    fn test_prior_mint_completes_without_hash() {
        let mut record = TransferRecord::burned(result());
        assert!(record.record_prior_mint().is_err());

        record.record_attestation(Bytes::from(vec![1u8; 65])).unwrap();
        record.record_prior_mint().unwrap();

        assert_eq!(record.state, TransferState::Completed);
        assert_eq!(record.mint_tx_hash, None);
    }

    #[test]
    fn test_record_json_round_trip() {
        let mut record = TransferRecord::burned(result());
        record.fail("mint reverted").unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["failure"], "mint reverted");
        assert!(json.get("attestation").is_none());

        let decoded: TransferRecord = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, record);
    }
}
