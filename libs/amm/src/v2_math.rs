//! Uniswap V2 style constant-product math on integers
//!
//! All amounts are smallest-unit `u128`; products go through 256-bit or
//! 512-bit intermediates. Every division rounds in the pool's favor: outputs round
//! down, required inputs round up.

use crate::error::{AmmError, Result};
use crate::fee::FeeRate;
use swap_types::{mul_div_floor, wide_mul_div_floor, U256};

/// Basis-point scale used for price impact and slippage
pub const BPS_SCALE: u128 = 10_000;

/// V2 AMM math functions with zero precision loss
pub struct V2Math;

impl V2Math {
    /// Exact output for `amount_in` using the x*y=k formula
    ///
    /// `output = floor(amount_in*(den-num)*reserve_out / (reserve_in*den + amount_in*(den-num)))`
    ///
    /// # Errors
    /// - `InsufficientInput` for a zero input
    /// - `PoolUninitialized` when either reserve is zero
    /// - `InsufficientLiquidity` when the output rounds to zero or would
    ///   drain `reserve_out`
    pub fn calculate_output_amount(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee: FeeRate,
    ) -> Result<u128> {
        if amount_in == 0 {
            return Err(AmmError::InsufficientInput);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::PoolUninitialized);
        }

        let amount_in_with_fee = U256::from(amount_in) * U256::from(fee.retained());
        let denominator = (U256::from(reserve_in) * U256::from(fee.denominator()))
            .checked_add(amount_in_with_fee)
            .ok_or_else(|| AmmError::overflow("swap output denominator"))?;

        let output =
            wide_mul_div_floor(amount_in_with_fee, U256::from(reserve_out), denominator)
                .ok_or_else(|| AmmError::overflow("swap output"))?;

        if output == 0 || output >= reserve_out {
            return Err(AmmError::InsufficientLiquidity {
                output,
                reserve_out,
            });
        }
        Ok(output)
    }

    /// Required input for a desired output (reverse calculation)
    ///
    /// Floors the exact quotient and adds one, so the returned input always
    /// buys at least `amount_out`.
    pub fn calculate_input_amount(
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee: FeeRate,
    ) -> Result<u128> {
        if amount_out == 0 {
            return Err(AmmError::InsufficientInput);
        }
        if reserve_in == 0 || reserve_out == 0 {
            return Err(AmmError::PoolUninitialized);
        }
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity {
                output: amount_out,
                reserve_out,
            });
        }

        let denominator = U256::from(reserve_out - amount_out) * U256::from(fee.retained());

        wide_mul_div_floor(
            U256::from(reserve_in) * U256::from(amount_out),
            U256::from(fee.denominator()),
            denominator,
        )
        .and_then(|input| input.checked_add(1))
            .ok_or_else(|| AmmError::overflow("swap input"))
    }

    /// Amount of B worth `amount_a` of A at the current reserve ratio, rounded down
    pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128> {
        if reserve_a == 0 || reserve_b == 0 {
            return Err(AmmError::PoolUninitialized);
        }
        mul_div_floor(amount_a, reserve_b, reserve_a).ok_or_else(|| AmmError::overflow("quote"))
    }

    /// Price impact of a trade in basis points
    ///
    /// Compares the fee-free execution price against the mid price:
    /// `1 - reserve_in / (reserve_in + amount_in)`.
    pub fn calculate_price_impact_bps(amount_in: u128, reserve_in: u128) -> Result<u32> {
        if reserve_in == 0 {
            return Err(AmmError::PoolUninitialized);
        }
        let denominator = U256::from(reserve_in) + U256::from(amount_in);
        let impact = U256::from(amount_in) * U256::from(BPS_SCALE) / denominator;
        // amount_in / (reserve_in + amount_in) < 1, so impact < BPS_SCALE
        Ok(impact.low_u32())
    }

    /// Apply a slippage tolerance in basis points, rounding down
    pub fn apply_slippage(amount: u128, slippage_bps: u32) -> u128 {
        let kept = BPS_SCALE.saturating_sub(u128::from(slippage_bps));
        mul_div_floor(amount, kept, BPS_SCALE).unwrap_or(0)
    }

    /// Integer square root (floor) using Newton's method
    pub fn integer_sqrt(value: U256) -> U256 {
        if value.is_zero() {
            return U256::zero();
        }
        if value <= U256::from(3u8) {
            return U256::one();
        }

        let mut x = value;
        let mut next = (x >> 1) + U256::one();
        while next < x {
            x = next;
            next = (x + value / x) >> 1;
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_output_calculation() {
        // 100 in against 1000:2000 reserves with 0.3% fee: floor(181.32)
        let output = V2Math::calculate_output_amount(100, 1000, 2000, FeeRate::DEFAULT).unwrap();
        assert_eq!(output, 181);
    }

    #[test]
    fn test_zero_fee_output() {
        // 100 * 2000 / 1100 = 181.81
        let output = V2Math::calculate_output_amount(100, 1000, 2000, FeeRate::ZERO).unwrap();
        assert_eq!(output, 181);
        let output = V2Math::calculate_output_amount(1000, 1000, 2000, FeeRate::ZERO).unwrap();
        assert_eq!(output, 1000);
    }

    #[test]
    fn test_output_rejections() {
        assert_eq!(
            V2Math::calculate_output_amount(0, 1000, 2000, FeeRate::DEFAULT),
            Err(AmmError::InsufficientInput)
        );
        assert_eq!(
            V2Math::calculate_output_amount(10, 0, 0, FeeRate::DEFAULT),
            Err(AmmError::PoolUninitialized)
        );
        // 1 wei in against a deep pool rounds to nothing
        assert!(matches!(
            V2Math::calculate_output_amount(1, 1_000_000, 1_000, FeeRate::DEFAULT),
            Err(AmmError::InsufficientLiquidity { output: 0, .. })
        ));
    }

    #[test]
    fn test_output_never_drains_reserve() {
        let output =
            V2Math::calculate_output_amount(u64::MAX as u128, 10, 10, FeeRate::ZERO).unwrap();
        assert_eq!(output, 9);
    }

    #[test]
    fn test_output_near_u128_limits() {
        let reserve = u128::MAX / 2;
        let output =
            V2Math::calculate_output_amount(reserve, reserve, reserve, FeeRate::DEFAULT).unwrap();
        // half the output reserve less the fee share, rounded down
        assert!(output < reserve / 2);
        assert!(output > reserve / 2 - reserve / 500);

        let input =
            V2Math::calculate_input_amount(output, reserve, reserve, FeeRate::DEFAULT).unwrap();
        assert!(input <= reserve + 1);
    }

    #[test]
    fn test_input_amount_buys_requested_output() {
        let fee = FeeRate::DEFAULT;
        let input = V2Math::calculate_input_amount(181, 1000, 2000, fee).unwrap();
        let output = V2Math::calculate_output_amount(input, 1000, 2000, fee).unwrap();
        assert!(output >= 181);
        assert!(V2Math::calculate_output_amount(input - 1, 1000, 2000, fee).unwrap() <= 181);

        assert!(matches!(
            V2Math::calculate_input_amount(2000, 1000, 2000, fee),
            Err(AmmError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_quote_rounds_down() {
        assert_eq!(V2Math::quote(100, 1000, 2000).unwrap(), 200);
        assert_eq!(V2Math::quote(1, 3, 2).unwrap(), 0);
        assert_eq!(V2Math::quote(1, 0, 2), Err(AmmError::PoolUninitialized));
    }

    #[test]
    fn test_price_impact() {
        // 100 into 1000: 100 / 1100 = 9.09%
        assert_eq!(V2Math::calculate_price_impact_bps(100, 1000).unwrap(), 909);
        assert_eq!(V2Math::calculate_price_impact_bps(0, 1000).unwrap(), 0);
        assert!(V2Math::calculate_price_impact_bps(u128::MAX, 1).unwrap() < 10_000);
    }

    #[test]
    fn test_apply_slippage() {
        assert_eq!(V2Math::apply_slippage(181, 50), 180);
        assert_eq!(V2Math::apply_slippage(10_000, 50), 9_950);
        assert_eq!(V2Math::apply_slippage(10_000, 20_000), 0);
    }

    #[test]
    fn test_sqrt_accuracy() {
        assert_eq!(V2Math::integer_sqrt(U256::from(100u64)), U256::from(10u64));
        assert_eq!(V2Math::integer_sqrt(U256::from(2u64)), U256::from(1u64));
        assert_eq!(V2Math::integer_sqrt(U256::from(1u64)), U256::from(1u64));
        assert_eq!(
            V2Math::integer_sqrt(U256::from(2_000_000u64)),
            U256::from(1414u64)
        );
        let big = U256::from(u128::MAX) * U256::from(u128::MAX);
        assert_eq!(V2Math::integer_sqrt(big), U256::from(u128::MAX));
    }
}
