// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Conversion between human-readable token amounts (`"100.5"`) and the
//! fixed-point integers contracts expect (`100500000` at 6 decimals).
//!
//! Parsing is exact decimal arithmetic on [`U256`]; no floating point is
//! involved at any step.
//!
//! ```rust
//! use cctp_transfer::codec::amount::{from_fixed_point, to_fixed_point};
//!
//! assert_eq!(to_fixed_point("100.50", 6).unwrap(), "100500000");
//! assert_eq!(from_fixed_point("100500000", 6).unwrap(), "100.5");
//! ```

use std::cmp::Ordering;

use alloy_primitives::U256;

use crate::error::{CctpError, Result};

/// Decimals of USDC and EURC on every supported network.
pub const USDC_DECIMALS: u8 = 6;

/// Limits applied by [`validate_amount`].
///
/// `min` and `max` are human-readable amounts. A missing `min` means zero,
/// so negative amounts are rejected unless a negative floor is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountRules {
    pub decimals: u8,
    pub min: Option<String>,
    pub max: Option<String>,
    pub allow_zero: bool,
}

impl Default for AmountRules {
    fn default() -> Self {
        Self {
            decimals: USDC_DECIMALS,
            min: None,
            max: None,
            allow_zero: true,
        }
    }
}

impl AmountRules {
    /// Rules for a burn: 6 decimals, strictly positive, no ceiling.
    pub fn transfer() -> Self {
        Self {
            allow_zero: false,
            ..Self::default()
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }
}

struct Decimal<'a> {
    negative: bool,
    integer: &'a str,
    fraction: &'a str,
}

impl Decimal<'_> {
    /// Fraction digits that carry value.
    fn significant_places(&self) -> usize {
        self.fraction.trim_end_matches('0').len()
    }
}

fn invalid(amount: &str, reason: impl Into<String>) -> CctpError {
    CctpError::InvalidAmount {
        amount: amount.to_string(),
        reason: reason.into(),
    }
}

fn parse_decimal(amount: &str) -> Result<Decimal<'_>> {
    let trimmed = amount.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    if ["nan", "inf", "infinity"]
        .iter()
        .any(|word| body.eq_ignore_ascii_case(word))
    {
        return Err(invalid(amount, "not a finite number"));
    }

    let (integer, fraction) = body.split_once('.').unwrap_or((body, ""));
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid(amount, "no digits"));
    }
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(integer) || !digits_only(fraction) {
        return Err(invalid(amount, "expected a decimal number"));
    }

    Ok(Decimal {
        negative,
        integer,
        fraction,
    })
}

/// Magnitude scaled by `10^decimals`, rounding half away from zero.
fn scale(decimal: &Decimal<'_>, decimals: u8, amount: &str) -> Result<U256> {
    let places = decimals as usize;
    let kept: String = decimal
        .fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(places)
        .collect();
    let digits = format!("{}{}", decimal.integer, kept);
    let digits = if digits.is_empty() { "0" } else { &digits };

    let mut value =
        U256::from_str_radix(digits, 10).map_err(|_| invalid(amount, "exceeds 256 bits"))?;
    if decimal
        .fraction
        .as_bytes()
        .get(places)
        .is_some_and(|&digit| digit >= b'5')
    {
        value = value
            .checked_add(U256::from(1))
            .ok_or_else(|| invalid(amount, "exceeds 256 bits"))?;
    }
    Ok(value)
}

fn signed(negative: bool, magnitude: U256) -> String {
    if negative && !magnitude.is_zero() {
        format!("-{magnitude}")
    } else {
        magnitude.to_string()
    }
}

/// Converts a human amount into an integer string at `decimals`.
///
/// Digits beyond `decimals` are rounded half away from zero.
pub fn to_fixed_point(amount: &str, decimals: u8) -> Result<String> {
    let decimal = parse_decimal(amount)?;
    let magnitude = scale(&decimal, decimals, amount)?;
    Ok(signed(decimal.negative, magnitude))
}

/// Converts an integer string at `decimals` back into a human amount, with
/// trailing fractional zeros removed.
pub fn from_fixed_point(raw: &str, decimals: u8) -> Result<String> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(raw, "expected an integer"));
    }
    let magnitude =
        U256::from_str_radix(digits, 10).map_err(|_| invalid(raw, "exceeds 256 bits"))?;

    let human = format_units(magnitude, decimals);
    if negative && !magnitude.is_zero() {
        Ok(format!("-{human}"))
    } else {
        Ok(human)
    }
}

/// Non-negative variant of [`to_fixed_point`] returning the integer itself.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256> {
    let decimal = parse_decimal(amount)?;
    let magnitude = scale(&decimal, decimals, amount)?;
    if decimal.negative && !magnitude.is_zero() {
        return Err(invalid(amount, "must not be negative"));
    }
    Ok(magnitude)
}

/// Renders a fixed-point value, e.g. a `balanceOf` result.
///
/// From 78 decimals up every `U256` is purely fractional, since `10^78`
/// exceeds the type.
pub fn format_units(value: U256, decimals: u8) -> String {
    let (integer, fraction) = match U256::from(10u64).checked_pow(U256::from(decimals)) {
        Some(divisor) => (value / divisor, value % divisor),
        None => (U256::ZERO, value),
    };

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    }
}

fn compare(a: (bool, U256), b: (bool, U256)) -> Ordering {
    let a_negative = a.0 && !a.1.is_zero();
    let b_negative = b.0 && !b.1.is_zero();
    match (a_negative, b_negative) {
        (false, false) => a.1.cmp(&b.1),
        (true, true) => b.1.cmp(&a.1),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}

fn bound(limit: &str, decimals: u8) -> Result<(bool, U256)> {
    let decimal = parse_decimal(limit)
        .map_err(|e| CctpError::InvalidConfig(format!("amount limit {limit:?}: {e}")))?;
    let magnitude = scale(&decimal, decimals, limit)?;
    Ok((decimal.negative, magnitude))
}

/// Checks `amount` against `rules` without converting it.
pub fn validate_amount(amount: &str, rules: &AmountRules) -> Result<()> {
    let decimal = parse_decimal(amount)?;

    let places = decimal.significant_places();
    if places > rules.decimals as usize {
        return Err(invalid(
            amount,
            format!(
                "{places} decimal places, at most {} supported",
                rules.decimals
            ),
        ));
    }

    let value = (decimal.negative, scale(&decimal, rules.decimals, amount)?);

    let min = rules.min.as_deref().unwrap_or("0");
    if compare(value, bound(min, rules.decimals)?) == Ordering::Less {
        return Err(invalid(amount, format!("below the minimum of {min}")));
    }
    if value.1.is_zero() && !rules.allow_zero {
        return Err(invalid(amount, "must be greater than zero"));
    }
    if let Some(max) = rules.max.as_deref() {
        if compare(value, bound(max, rules.decimals)?) == Ordering::Greater {
            return Err(invalid(amount, format!("above the maximum of {max}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100.50", "100500000")]
    #[case("1", "1000000")]
    #[case("0.000001", "1")]
    #[case(".5", "500000")]
    #[case("+2.", "2000000")]
    #[case("-3.25", "-3250000")]
    #[case("1.0000005", "1000001")]
    #[case("1.0000004", "1000000")]
    #[case("-1.0000005", "-1000001")]
    #[case("-0.0000001", "0")]
    #[case("  42  ", "42000000")]
    fn test_to_fixed_point(#[case] amount: &str, #[case] expected: &str) {
        assert_eq!(to_fixed_point(amount, USDC_DECIMALS).unwrap(), expected);
    }

    #[rstest]
    #[case("100500000", "100.5")]
    #[case("1", "0.000001")]
    #[case("1000000", "1")]
    #[case("0", "0")]
    #[case("-1500000", "-1.5")]
    #[case("123456789", "123.456789")]
    fn test_from_fixed_point(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(from_fixed_point(raw, USDC_DECIMALS).unwrap(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case(".")]
    #[case("1.2.3")]
    #[case("1e6")]
    #[case("NaN")]
    #[case("-Infinity")]
    fn test_to_fixed_point_rejects(#[case] amount: &str) {
        assert!(matches!(
            to_fixed_point(amount, USDC_DECIMALS),
            Err(CctpError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_from_fixed_point_rejects_fractions() {
        assert!(from_fixed_point("1.5", USDC_DECIMALS).is_err());
        assert!(from_fixed_point("", USDC_DECIMALS).is_err());
    }

    #[test]
    fn test_round_trip_normalises() {
        for (amount, normalised) in [
            ("100.50", "100.5"),
            ("0.100000", "0.1"),
            ("007", "7"),
            ("12.345678", "12.345678"),
        ] {
            let raw = to_fixed_point(amount, USDC_DECIMALS).unwrap();
            assert_eq!(from_fixed_point(&raw, USDC_DECIMALS).unwrap(), normalised);
        }
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(to_fixed_point("12.5", 0).unwrap(), "13");
        assert_eq!(from_fixed_point("12", 0).unwrap(), "12");
    }

    #[test]
    fn test_overflow_is_rejected() {
        let huge = "9".repeat(80);
        assert!(to_fixed_point(&huge, USDC_DECIMALS).is_err());
    }

    #[test]
    fn test_format_units_beyond_u256_scale() {
        assert_eq!(
            format_units(U256::from(1), 80),
            format!("0.{}1", "0".repeat(79))
        );
        assert_eq!(
            format_units(U256::from(5), 78),
            format!("0.{}5", "0".repeat(77))
        );
        assert_eq!(
            from_fixed_point("-42", 77).unwrap(),
            format!("-0.{}42", "0".repeat(75))
        );
        assert_eq!(format_units(U256::ZERO, 255), "0");

        let max = U256::MAX.to_string();
        assert_eq!(
            format_units(U256::MAX, 78),
            format!("0.{}", max.trim_end_matches('0'))
        );
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(
            parse_units("25", USDC_DECIMALS).unwrap(),
            U256::from(25_000_000u64)
        );
        assert!(parse_units("-1", USDC_DECIMALS).is_err());
        assert_eq!(
            format_units(U256::from(25_000_001u64), USDC_DECIMALS),
            "25.000001"
        );
    }

    #[test]
    fn test_validate_amount_transfer_rules() {
        let rules = AmountRules::transfer();
        assert!(validate_amount("10.5", &rules).is_ok());
        assert!(validate_amount("0.000001", &rules).is_ok());
        assert!(validate_amount("1.5000000", &rules).is_ok());

        let err = validate_amount("0", &rules).unwrap_err();
        insta::assert_snapshot!(err, @r#"Invalid amount "0": must be greater than zero"#);

        let err = validate_amount("-5", &rules).unwrap_err();
        insta::assert_snapshot!(err, @r#"Invalid amount "-5": below the minimum of 0"#);

        let err = validate_amount("1.0000001", &rules).unwrap_err();
        insta::assert_snapshot!(err, @r#"Invalid amount "1.0000001": 7 decimal places, at most 6 supported"#);

        assert!(validate_amount("inf", &rules).is_err());
    }

    #[test]
    fn test_validate_amount_bounds() {
        let rules = AmountRules::default().with_min("-10").with_max("1000");
        assert!(validate_amount("-10", &rules).is_ok());
        assert!(validate_amount("0", &rules).is_ok());
        assert!(validate_amount("1000", &rules).is_ok());
        assert!(validate_amount("-10.000001", &rules).is_err());
        assert!(validate_amount("1000.000001", &rules).is_err());
    }

    #[test]
    fn test_invalid_limit_is_a_configuration_error() {
        let rules = AmountRules::default().with_max("lots");
        assert!(matches!(
            validate_amount("1", &rules),
            Err(CctpError::InvalidConfig(_))
        ));
    }
}
