// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Live implementations of the traits in [`crate::traits`]: alloy RPC
//! providers, Circle's Iris service and the tokio clock.

mod alloy;
mod iris;
mod tokio_clock;

pub use self::alloy::AlloyChainClient;
pub use self::iris::{
    IrisAttestationProvider, DEFAULT_HTTP_TIMEOUT, MAINNET_ATTESTATION_URL,
    SANDBOX_ATTESTATION_URL,
};
pub use self::tokio_clock::TokioClock;
