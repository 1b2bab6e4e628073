// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Attestation lookups and the fixed-interval polling loop around them.

mod config;
mod poller;

pub use config::PollingConfig;
pub use poller::AttestationPoller;
