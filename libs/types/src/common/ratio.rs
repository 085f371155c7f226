//! Exact price ratios
//!
//! A pool's quoted price is the ratio of its two reserves. Keeping it as a
//! pair of integers means two reads of the same reserves compare equal and
//! no rounding happens until a caller asks for a projection.

use crate::common::wide::{mul_div_floor, U256};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact rational `numerator / denominator` with a non-zero denominator
///
/// Equality is structural: `2/1` and `4/2` are different values, matching
/// the reserves they were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ratio {
    numerator: u128,
    denominator: u128,
}

impl Ratio {
    /// Scale of the fixed-point projection (18 decimals, like wei)
    pub const SCALE: u128 = 1_000_000_000_000_000_000;

    /// Create a ratio, `None` when the denominator is zero
    pub fn new(numerator: u128, denominator: u128) -> Option<Self> {
        if denominator == 0 {
            None
        } else {
            Some(Self {
                numerator,
                denominator,
            })
        }
    }

    pub fn numerator(self) -> u128 {
        self.numerator
    }

    pub fn denominator(self) -> u128 {
        self.denominator
    }

    /// `floor(amount * numerator / denominator)`
    pub fn apply(self, amount: u128) -> Option<u128> {
        mul_div_floor(amount, self.numerator, self.denominator)
    }

    /// Fixed-point projection scaled by [`Ratio::SCALE`], rounded down
    pub fn to_fixed_point(self) -> Option<u128> {
        mul_div_floor(self.numerator, Self::SCALE, self.denominator)
    }

    /// Integer part, the value an integer-returning `getRatio` reports
    pub fn floor(self) -> u128 {
        self.numerator / self.denominator
    }

    /// Compare `self` with `other` without dividing
    pub fn cmp_value(self, other: Self) -> std::cmp::Ordering {
        let lhs = U256::from(self.numerator) * U256::from(other.denominator);
        let rhs = U256::from(other.numerator) * U256::from(self.denominator);
        lhs.cmp(&rhs)
    }

    /// Convert for display
    ///
    /// # Warning
    /// Only use for display or logging. `None` when either side exceeds the
    /// 96-bit `Decimal` mantissa.
    pub fn to_decimal(self) -> Option<Decimal> {
        let numerator = Decimal::from_u128(self.numerator)?;
        let denominator = Decimal::from_u128(self.denominator)?;
        numerator.checked_div(denominator)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::cmp::Ordering;

    #[test]
    fn test_zero_denominator_rejected() {
        assert!(Ratio::new(1, 0).is_none());
        assert!(Ratio::new(0, 5).is_some());
    }

    #[test]
    fn test_projections() {
        let ratio = Ratio::new(2000, 1000).unwrap();
        assert_eq!(ratio.floor(), 2);
        assert_eq!(ratio.to_fixed_point(), Some(2 * Ratio::SCALE));
        assert_eq!(ratio.to_decimal(), Some(dec!(2)));
        assert_eq!(ratio.apply(7), Some(14));

        let third = Ratio::new(1, 3).unwrap();
        assert_eq!(third.to_fixed_point(), Some(333_333_333_333_333_333));
        assert_eq!(third.floor(), 0);
    }

    #[test]
    fn test_value_comparison_ignores_representation() {
        let a = Ratio::new(2, 1).unwrap();
        let b = Ratio::new(4, 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.cmp_value(b), Ordering::Equal);
        assert_eq!(a.cmp_value(Ratio::new(3, 1).unwrap()), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Ratio::new(1819, 1100).unwrap().to_string(), "1819/1100");
    }
}
