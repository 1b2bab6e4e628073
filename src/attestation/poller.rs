// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use alloy_primitives::{Bytes, B256};
use tracing::{debug, error, info, warn, Instrument};

use super::PollingConfig;
use crate::error::{CctpError, Result};
use crate::protocol::{AttestationRecord, AttestationState};
use crate::spans;
use crate::traits::{AttestationProvider, Clock};

/// Looks up attestations once, or polls until one is complete.
///
/// Records are never cached: every [`fetch`](Self::fetch) goes to the
/// provider.
#[derive(Debug, Clone)]
pub struct AttestationPoller<A, C> {
    provider: A,
    clock: C,
}

impl<A: AttestationProvider, C: Clock> AttestationPoller<A, C> {
    pub fn new(provider: A, clock: C) -> Self {
        Self { provider, clock }
    }

    pub fn provider(&self) -> &A {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// One provider call, mapped to the two-state record.
    pub async fn fetch(&self, message_hash: B256) -> Result<AttestationRecord> {
        let response = self.provider.get_attestation(message_hash).await?;
        let record = AttestationRecord::from_response(message_hash, response);
        debug!(
            message_hash = %message_hash,
            status = ?record.status,
            has_attestation = record.attestation.is_some(),
            event = "attestation_fetched"
        );
        Ok(record)
    }

    /// Polls until the attestation is complete with a payload.
    ///
    /// Sleeps `poll_interval` between attempts but not after the last one.
    /// Provider errors end the loop immediately; only pending answers are
    /// retried.
    ///
    /// # Errors
    ///
    /// - [`AttestationTimeout`](CctpError::AttestationTimeout) after
    ///   `max_attempts` attempts without a usable attestation
    /// - Whatever the provider returned, on the first provider failure
    pub async fn wait_for(&self, message_hash: B256, config: PollingConfig) -> Result<Bytes> {
        let span = spans::wait_for_attestation(
            &message_hash,
            config.max_attempts,
            config.poll_interval_ms,
        );

        async move {
            let started = self.clock.now();
            info!(event = "attestation_polling_started");

            for attempt in 1..=config.max_attempts {
                let fetched = self
                    .fetch(message_hash)
                    .instrument(spans::fetch_attestation(&message_hash, attempt))
                    .await;

                let record = match fetched {
                    Ok(record) => record,
                    Err(e) => {
                        spans::record_error(&e);
                        error!(
                            error = %e,
                            attempt = attempt,
                            event = "attestation_fetch_failed"
                        );
                        return Err(e);
                    }
                };

                match record {
                    AttestationRecord {
                        status: AttestationState::Complete,
                        attestation: Some(attestation),
                        ..
                    } => {
                        info!(
                            attempt = attempt,
                            attestation_length_bytes = attestation.len(),
                            elapsed_ms = self.clock.now().duration_since(started).as_millis() as u64,
                            event = "attestation_complete"
                        );
                        return Ok(attestation);
                    }
                    AttestationRecord {
                        status: AttestationState::Complete,
                        attestation: None,
                        ..
                    } => {
                        warn!(attempt = attempt, event = "attestation_complete_without_payload");
                    }
                    AttestationRecord { .. } => {
                        debug!(
                            attempt = attempt,
                            max_attempts = config.max_attempts,
                            event = "attestation_pending"
                        );
                    }
                }

                if attempt < config.max_attempts {
                    self.clock.sleep(config.poll_interval()).await;
                }
            }

            let err = CctpError::AttestationTimeout {
                attempts: config.max_attempts,
            };
            spans::record_error(&err);
            error!(
                attempts = config.max_attempts,
                event = "attestation_timeout"
            );
            Err(err)
        }
        .instrument(span)
        .await
    }
}
