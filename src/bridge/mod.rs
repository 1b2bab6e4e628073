// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Burn → attest → mint orchestration and the state a transfer carries
//! between those steps.

mod state;
mod transfer;

pub use state::{MintResult, TransferRecord, TransferResult, TransferState, TransferStatus};
pub use transfer::CctpTransfer;
