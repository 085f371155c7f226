//! Swap fee as an exact rational

use crate::error::{AmmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee retained by the pool on every swap input, `numerator / denominator`
///
/// Kept as two integers so `1 - f` is exact: 0.3% is `30 / 10_000` and the
/// trader's effective input is `input * 9_970 / 10_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRate {
    numerator: u32,
    denominator: u32,
}

impl FeeRate {
    pub const BPS_DENOMINATOR: u32 = 10_000;

    /// 0.3%, the usual constant-product default
    pub const DEFAULT: Self = Self {
        numerator: 30,
        denominator: Self::BPS_DENOMINATOR,
    };

    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// `numerator` must be strictly below a non-zero `denominator`
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if denominator == 0 || numerator >= denominator {
            return Err(AmmError::InvalidFee {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Fee in basis points (30 = 0.3%)
    pub fn from_bps(bps: u32) -> Result<Self> {
        Self::new(bps, Self::BPS_DENOMINATOR)
    }

    pub fn numerator(self) -> u32 {
        self.numerator
    }

    pub fn denominator(self) -> u32 {
        self.denominator
    }

    /// `denominator - numerator`, the share of input that reaches the curve
    pub fn retained(self) -> u32 {
        self.denominator - self.numerator
    }

    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    /// Fee charged on `amount`, rounded up in the pool's favor
    pub fn fee_on(self, amount: u128) -> Option<u128> {
        swap_types::mul_div_ceil(
            amount,
            u128::from(self.numerator),
            u128::from(self.denominator),
        )
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
