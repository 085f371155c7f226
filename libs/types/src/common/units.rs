//! Conversion between display strings and smallest-unit amounts
//!
//! Clients enter amounts like `"0.25"` ETH; the engine only sees integer wei.
//! Parsing goes through `Decimal` so the string is read exactly, then scales
//! with checked integer math. Formatting never touches floating point.
//!
//! ## Examples
//! ```
//! use swap_types::{format_display, format_units, parse_units};
//!
//! let amount = parse_units("12.5", 6).unwrap();
//! assert_eq!(amount, 12_500_000);
//! assert_eq!(format_units(amount, 6), "12.5");
//! assert_eq!(format_display(1_234_567, 6, 3), "1.235");
//! ```

use crate::common::errors::UnitsError;
use rust_decimal::Decimal;
use std::str::FromStr;

/// ETH and most ERC-20 tokens use 18 decimals
pub const ETHER_DECIMALS: u8 = 18;

fn pow10(exponent: u32) -> Option<u128> {
    10u128.checked_pow(exponent)
}

/// Parse a decimal string into smallest units with `decimals` fractional digits
pub fn parse_units(input: &str, decimals: u8) -> Result<u128, UnitsError> {
    let trimmed = input.trim();
    let decimal = Decimal::from_str(trimmed).map_err(|_| UnitsError::InvalidDecimal {
        input: input.to_string(),
    })?;

    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(UnitsError::Negative {
            input: input.to_string(),
        });
    }

    let decimal = decimal.normalize();
    let scale = decimal.scale();
    if scale > u32::from(decimals) {
        return Err(UnitsError::PrecisionLoss {
            input: input.to_string(),
            decimals,
        });
    }

    let factor = pow10(u32::from(decimals) - scale)
        .ok_or(UnitsError::UnsupportedDecimals { decimals })?;
    let mantissa = decimal.mantissa().unsigned_abs();

    mantissa
        .checked_mul(factor)
        .ok_or_else(|| UnitsError::Overflow {
            input: input.to_string(),
        })
}

/// Format smallest units as a decimal string, trimming trailing zeros
///
/// Always keeps at least one fractional digit (`"1.0"`), like ethers'
/// `formatUnits`.
pub fn format_units(value: u128, decimals: u8) -> String {
    let Some(unit) = pow10(u32::from(decimals)) else {
        return value.to_string();
    };
    if decimals == 0 {
        return format!("{value}.0");
    }

    let whole = value / unit;
    let fraction = value % unit;
    let padded = format!("{:0width$}", fraction, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

/// Round to `places` fractional digits (half away from zero) for display
///
/// The balance cells of the swap form show three places.
pub fn format_display(value: u128, decimals: u8, places: u8) -> String {
    if places >= decimals {
        return pad_fraction(value, decimals, places);
    }
    let Some(divisor) = pow10(u32::from(decimals - places)) else {
        return value.to_string();
    };

    let quotient = value / divisor;
    let remainder = value % divisor;
    let rounded = if remainder >= divisor - divisor / 2 {
        quotient.saturating_add(1)
    } else {
        quotient
    };
    pad_fraction(rounded, places, places)
}

fn pad_fraction(value: u128, decimals: u8, places: u8) -> String {
    let Some(unit) = pow10(u32::from(decimals)) else {
        return value.to_string();
    };
    let whole = value / unit;
    if places == 0 {
        return whole.to_string();
    }
    let fraction = value % unit;
    let digits = format!("{:0width$}", fraction, width = decimals as usize);
    let digits = format!("{:0<width$}", digits, width = places as usize);
    format!("{whole}.{digits}")
}

/// Parse an ETH amount into wei
pub fn parse_ether(input: &str) -> Result<u128, UnitsError> {
    parse_units(input, ETHER_DECIMALS)
}

/// Format wei as ETH
pub fn format_ether(wei: u128) -> String {
    format_units(wei, ETHER_DECIMALS)
}
