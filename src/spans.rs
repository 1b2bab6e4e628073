// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Span constructors for transfer operations.
//!
//! Span names are static (`cctp_transfer.*`) and every value travels as a
//! structured attribute. Spans that can fail declare the `error.*` and
//! `otel.status_code` fields up front so [`record_error`] can fill them in.
//!
//! ```rust,ignore
//! use cctp_transfer::{spans, Network};
//!
//! let span = spans::wait_for_attestation(&message_hash, 30, 10_000);
//! let _guard = span.enter();
//! ```

use alloy_primitives::{Address, TxHash, B256, U256};
use tracing::Span;
use url::Url;

use crate::chain::Network;
use crate::error::CctpError;

/// Whole burn half of a transfer.
///
/// Children: `cctp_transfer.approve`, `cctp_transfer.deposit_for_burn`.
#[inline]
pub fn initiate_transfer(
    source: Network,
    destination: Network,
    recipient: &str,
    amount: &str,
) -> Span {
    tracing::info_span!(
        "cctp_transfer.initiate_transfer",
        source_network = %source,
        destination_network = %destination,
        recipient = recipient,
        amount = amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

#[inline]
pub fn approve(token: &Address, spender: &Address, amount: &U256) -> Span {
    tracing::debug_span!(
        "cctp_transfer.approve",
        token_address = %token,
        spender = %spender,
        amount = %amount,
    )
}

#[inline]
pub fn deposit_for_burn(
    from_address: &Address,
    mint_recipient: &B256,
    destination_domain: u32,
    token_address: &Address,
    amount: &U256,
) -> Span {
    tracing::info_span!(
        "cctp_transfer.deposit_for_burn",
        from_address = %from_address,
        mint_recipient = %mint_recipient,
        destination_domain = destination_domain,
        token_address = %token_address,
        amount = %amount,
    )
}

/// Re-reading a mined burn from its receipt.
#[inline]
pub fn recover_transfer(tx_hash: TxHash, source: Network) -> Span {
    tracing::info_span!(
        "cctp_transfer.recover_transfer",
        tx_hash = %tx_hash,
        source_network = %source,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Polling loop around the attestation service.
///
/// Children: `cctp_transfer.fetch_attestation`, one per attempt.
#[inline]
pub fn wait_for_attestation(message_hash: &B256, max_attempts: u32, poll_interval_ms: u64) -> Span {
    tracing::info_span!(
        "cctp_transfer.wait_for_attestation",
        message_hash = %message_hash,
        max_attempts = max_attempts,
        poll_interval_ms = poll_interval_ms,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// One attestation lookup. `attempt` is 1-based.
#[inline]
pub fn fetch_attestation(message_hash: &B256, attempt: u32) -> Span {
    tracing::debug_span!(
        "cctp_transfer.fetch_attestation",
        message_hash = %message_hash,
        attempt = attempt,
    )
}

/// HTTP request to the attestation service.
#[inline]
pub fn attestation_request(url: &Url) -> Span {
    tracing::trace_span!("cctp_transfer.attestation_request", http.method = "GET", http.url = %url)
}

/// Mint on the destination chain.
#[inline]
pub fn complete_transfer(
    message_hash: &B256,
    destination: Network,
    attestation_length: usize,
) -> Span {
    tracing::info_span!(
        "cctp_transfer.complete_transfer",
        message_hash = %message_hash,
        destination_network = %destination,
        attestation_length_bytes = attestation_length,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Marks the current span as failed with `error`.
///
/// Sets `error.type` to the variant name, `error.message` to the display
/// text and `otel.status_code` to `ERROR`. Fields the span did not declare
/// are ignored by `tracing`.
pub fn record_error(error: &CctpError) {
    let current_span = Span::current();
    current_span.record("error.type", error.error_type());
    current_span.record("error.message", error.to_string());
    current_span.record("otel.status_code", "ERROR");
}

/// Like [`record_error`] for failures that are not a [`CctpError`] yet, with
/// an optional hint for whoever reads the trace.
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
