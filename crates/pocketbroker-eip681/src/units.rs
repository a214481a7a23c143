//! Conversion between wei and ether.
//!
//! The wei side is always handled as a 256-bit integer so balances far beyond
//! `2^53` keep every digit. The ether side goes through [`rust_decimal`].
//!
//! | Input                              | Output                  |
//! |------------------------------------|-------------------------|
//! | `format_wei_to_eth("1000000000000000000", 4)` | `"1.0000"`   |
//! | `format_wei_to_eth("999950000000000000", 4)`  | `"1.0000"`   |
//! | `format_eth_to_wei("0.5")`         | `"500000000000000000"`  |

use alloy_primitives::U256;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal places of ether (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: u32 = 18;

/// Fractional digits shown by default when formatting ether.
pub const DEFAULT_ETH_DISPLAY_DECIMALS: u32 = 4;

/// Upper bound on fractional digits when formatting ether. `U256::MAX` has 78
/// decimal digits, so nothing past the 77th place can ever be non-zero.
pub const MAX_ETH_DISPLAY_DECIMALS: u32 = 77;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("Invalid wei amount {0:?}: expected a decimal integer")]
    InvalidWei(String),
    #[error("Invalid ether amount {0:?}")]
    InvalidEth(String),
    #[error("Display decimals {0} exceed the maximum of {MAX_ETH_DISPLAY_DECIMALS}")]
    DecimalsTooLarge(u32),
}

/// Parses a non-negative decimal integer. Digits only: no sign, no `_`, no exponent.
pub(crate) fn parse_decimal_u256(s: &str) -> Option<U256> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_str_radix(s, 10).ok()
}

fn pow10(exp: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Formats a wei amount given as a decimal string (optionally negative) as ether
/// with exactly `decimals` fractional digits.
///
/// Rounds half away from zero. With `decimals == 0` no decimal point is printed.
/// `decimals` above [`MAX_ETH_DISPLAY_DECIMALS`] is rejected.
///
/// ```
/// use pocketbroker_eip681::units::format_wei_to_eth;
///
/// assert_eq!(format_wei_to_eth("1000000000000000000", 4).unwrap(), "1.0000");
/// assert_eq!(format_wei_to_eth("-1250000000000000000", 1).unwrap(), "-1.3");
/// assert!(format_wei_to_eth("1.5", 4).is_err());
/// ```
pub fn format_wei_to_eth(wei: &str, decimals: u32) -> Result<String, UnitsError> {
    let (negative, digits) = match wei.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, wei),
    };
    let magnitude =
        parse_decimal_u256(digits).ok_or_else(|| UnitsError::InvalidWei(wei.to_string()))?;
    let formatted = format_wei_u256_to_eth(magnitude, decimals)?;
    let is_zero = formatted.bytes().all(|b| b == b'0' || b == b'.');
    if negative && !is_zero {
        Ok(format!("-{formatted}"))
    } else {
        Ok(formatted)
    }
}

/// Formats a wei amount as ether with exactly `decimals` fractional digits.
pub fn format_wei_u256_to_eth(wei: U256, decimals: u32) -> Result<String, UnitsError> {
    if decimals > MAX_ETH_DISPLAY_DECIMALS {
        return Err(UnitsError::DecimalsTooLarge(decimals));
    }
    let unit = pow10(ETHER_DECIMALS);
    let mut whole = wei / unit;
    let remainder = wei % unit;

    if decimals >= ETHER_DECIMALS {
        let padding = "0".repeat((decimals - ETHER_DECIMALS) as usize);
        return Ok(format!("{whole}.{:0>18}{padding}", remainder.to_string()));
    }

    let step = pow10(ETHER_DECIMALS - decimals);
    let mut fraction = remainder / step;
    if remainder % step * U256::from(2u64) >= step {
        fraction += U256::from(1u64);
    }
    if fraction == pow10(decimals) {
        whole += U256::from(1u64);
        fraction = U256::ZERO;
    }

    if decimals == 0 {
        Ok(whole.to_string())
    } else {
        Ok(format!(
            "{whole}.{:0>width$}",
            fraction.to_string(),
            width = decimals as usize
        ))
    }
}

/// Converts an ether amount to wei, floored to a whole wei.
///
/// Accepts plain decimals (`"0.5"`, `"-2"`) and scientific notation
/// (`"1.5e-3"`). Digits past the 18th decimal place are discarded: sub-wei
/// precision cannot be represented.
///
/// Plain decimals are converted digit by digit, so inputs with more
/// significant digits than a [`Decimal`] holds are still floored exactly.
///
/// ```
/// use pocketbroker_eip681::units::format_eth_to_wei;
///
/// assert_eq!(format_eth_to_wei("0.5").unwrap(), "500000000000000000");
/// assert_eq!(format_eth_to_wei("1.5e-3").unwrap(), "1500000000000000");
/// ```
pub fn format_eth_to_wei(eth: &str) -> Result<String, UnitsError> {
    let trimmed = eth.trim();
    let invalid = || UnitsError::InvalidEth(eth.to_string());
    if let Some(plain) = PlainDecimal::split(trimmed) {
        return plain.to_wei().ok_or_else(invalid);
    }
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;
    Ok(decimal_to_wei(amount))
}

/// `[-+]digits[.digits]` with at least one digit overall.
struct PlainDecimal<'a> {
    negative: bool,
    whole: &'a str,
    fraction: &'a str,
}

impl<'a> PlainDecimal<'a> {
    fn split(s: &'a str) -> Option<Self> {
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
            return None;
        }
        Some(Self {
            negative,
            whole,
            fraction,
        })
    }

    fn to_wei(&self) -> Option<String> {
        let places = ETHER_DECIMALS as usize;
        let (kept, dropped) = self.fraction.split_at(self.fraction.len().min(places));
        let mut wei = U256::from_str_radix(&format!("{}{kept:0<places$}", self.whole), 10).ok()?;
        if self.negative && dropped.bytes().any(|b| b != b'0') {
            // floor toward negative infinity
            wei = wei.checked_add(U256::from(1u64))?;
        }
        if self.negative && !wei.is_zero() {
            Some(format!("-{wei}"))
        } else {
            Some(wei.to_string())
        }
    }
}

/// Converts a floating-point ether amount to wei, floored to a whole wei.
pub fn format_eth_f64_to_wei(eth: f64) -> Result<String, UnitsError> {
    let amount = Decimal::from_f64(eth).ok_or_else(|| UnitsError::InvalidEth(eth.to_string()))?;
    Ok(decimal_to_wei(amount))
}

fn decimal_to_wei(amount: Decimal) -> String {
    let floored = amount.round_dp_with_strategy(ETHER_DECIMALS, RoundingStrategy::ToNegativeInfinity);
    let mantissa = U256::from(floored.mantissa().unsigned_abs());
    // scale <= 18 after rounding; a 96-bit mantissa times 10^18 fits in 256 bits
    let wei = mantissa * pow10(ETHER_DECIMALS - floored.scale());
    if floored.is_sign_negative() && !wei.is_zero() {
        format!("-{wei}")
    } else {
        wei.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_ether() {
        assert_eq!(
            format_wei_to_eth("1000000000000000000", DEFAULT_ETH_DISPLAY_DECIMALS).unwrap(),
            "1.0000"
        );
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_wei_to_eth("999950000000000000", 4).unwrap(), "1.0000");
        assert_eq!(format_wei_to_eth("999949999999999999", 4).unwrap(), "0.9999");
        assert_eq!(format_wei_to_eth("2500000000000000000", 0).unwrap(), "3");
        assert_eq!(format_wei_to_eth("-2500000000000000000", 0).unwrap(), "-3");
        assert_eq!(format_wei_to_eth("1500000000000000000", 2).unwrap(), "1.50");
    }

    #[test]
    fn test_dust_rounds_to_zero_without_sign() {
        assert_eq!(format_wei_to_eth("49999999999999", 4).unwrap(), "0.0000");
        assert_eq!(format_wei_to_eth("-1", 4).unwrap(), "0.0000");
        assert_eq!(format_wei_to_eth("0", 0).unwrap(), "0");
    }

    #[test]
    fn test_large_values_keep_precision() {
        assert_eq!(
            format_wei_to_eth("123456789012345678901234567890", 4).unwrap(),
            "123456789012.3457"
        );
        let max = U256::MAX.to_string();
        assert!(format_wei_to_eth(&max, 4).unwrap().starts_with("115792089237316195423570985008687907853269984665640564039457"));
    }

    #[test]
    fn test_full_precision_and_beyond() {
        assert_eq!(
            format_wei_to_eth("1", 18).unwrap(),
            "0.000000000000000001"
        );
        assert_eq!(
            format_wei_to_eth("1", 20).unwrap(),
            "0.00000000000000000100"
        );
    }

    #[test]
    fn test_invalid_wei() {
        for input in ["", "-", "1.5", "1e18", "abc", "+1", "0x10", " 1"] {
            assert_eq!(
                format_wei_to_eth(input, 4),
                Err(UnitsError::InvalidWei(input.to_string())),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_eth_to_wei() {
        assert_eq!(format_eth_to_wei("0.5").unwrap(), "500000000000000000");
        assert_eq!(format_eth_to_wei("1").unwrap(), "1000000000000000000");
        assert_eq!(format_eth_to_wei("0").unwrap(), "0");
        assert_eq!(format_eth_to_wei(" 2.25 ").unwrap(), "2250000000000000000");
        assert_eq!(format_eth_to_wei("-0.5").unwrap(), "-500000000000000000");
    }

    #[test]
    fn test_eth_to_wei_scientific() {
        assert_eq!(format_eth_to_wei("1.5e-3").unwrap(), "1500000000000000");
        assert_eq!(format_eth_to_wei("2e3").unwrap(), "2000000000000000000000");
    }

    #[test]
    fn test_eth_to_wei_floors_sub_wei() {
        assert_eq!(format_eth_to_wei("0.0000000000000000019").unwrap(), "1");
        assert_eq!(format_eth_to_wei("0.0000000000000000009").unwrap(), "0");
        assert_eq!(format_eth_to_wei("-0.0000000000000000001").unwrap(), "-1");
    }

    #[test]
    fn test_eth_to_wei_floors_beyond_decimal_precision() {
        assert_eq!(
            format_eth_to_wei("1.99999999999999999999999999999").unwrap(),
            "1999999999999999999"
        );
        assert_eq!(
            format_eth_to_wei("-1.99999999999999999999999999999").unwrap(),
            "-2000000000000000000"
        );
        assert_eq!(
            format_eth_to_wei("123456789012345678901234567890.123456789012345678").unwrap(),
            "123456789012345678901234567890123456789012345678"
        );
        assert_eq!(format_eth_to_wei(".5").unwrap(), "500000000000000000");
        assert_eq!(format_eth_to_wei("+3.").unwrap(), "3000000000000000000");
    }

    #[test]
    fn test_eth_to_wei_overflow_rejected() {
        let huge = "9".repeat(80);
        assert_eq!(format_eth_to_wei(&huge), Err(UnitsError::InvalidEth(huge.clone())));
    }

    #[test]
    fn test_display_decimals_bounded() {
        assert_eq!(
            format_wei_to_eth("1", MAX_ETH_DISPLAY_DECIMALS + 1),
            Err(UnitsError::DecimalsTooLarge(MAX_ETH_DISPLAY_DECIMALS + 1))
        );
        assert_eq!(
            format_wei_to_eth("1", u32::MAX),
            Err(UnitsError::DecimalsTooLarge(u32::MAX))
        );
        let widest = format_wei_to_eth("1", MAX_ETH_DISPLAY_DECIMALS).unwrap();
        assert_eq!(widest.len(), 2 + MAX_ETH_DISPLAY_DECIMALS as usize);
        assert!(widest.starts_with("0.000000000000000001"));
    }

    #[test]
    fn test_eth_to_wei_invalid() {
        assert!(matches!(format_eth_to_wei(""), Err(UnitsError::InvalidEth(_))));
        assert!(matches!(format_eth_to_wei("abc"), Err(UnitsError::InvalidEth(_))));
        for input in ["1.2.3", "ten"] {
            assert!(format_eth_to_wei(input).is_err(), "{input:?}");
        }
        assert!(matches!(format_eth_f64_to_wei(f64::NAN), Err(UnitsError::InvalidEth(_))));
    }

    #[test]
    fn test_eth_f64_to_wei() {
        assert_eq!(format_eth_f64_to_wei(0.5).unwrap(), "500000000000000000");
        assert_eq!(format_eth_f64_to_wei(2.0).unwrap(), "2000000000000000000");
    }

    #[test]
    fn test_wei_eth_round_trip() {
        let wei = format_eth_to_wei("12.345678").unwrap();
        assert_eq!(wei, "12345678000000000000");
        assert_eq!(format_wei_to_eth(&wei, 6).unwrap(), "12.345678");
    }
}
