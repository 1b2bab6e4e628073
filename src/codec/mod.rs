// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Address and amount codecs.

pub mod address;
pub mod amount;

pub use address::{
    canonical_encoding, from_canonical_form, is_valid_address, to_canonical_form, CanonicalEncoding,
};
pub use amount::{
    format_units, from_fixed_point, parse_units, to_fixed_point, validate_amount, AmountRules,
    USDC_DECIMALS,
};
