//! Swap previews for clients
//!
//! What a trader sees before submitting: the expected output, the minimum
//! output after slippage tolerance (the value to pass as `min_output`), the
//! fee and the price impact. Nothing here touches pool state.

use crate::asset::SwapDirection;
use crate::error::{AmmError, Result};
use crate::pricing::PricingEngine;
use crate::reserves::Reserves;
use crate::v2_math::V2Math;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use swap_types::Ratio;

/// Slippage tolerance clients use unless told otherwise, 0.5%
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPreview {
    pub direction: SwapDirection,
    pub input: u128,
    pub expected_output: u128,
    /// `expected_output` less the slippage tolerance, rounded down
    pub minimum_output: u128,
    pub price_impact_bps: u32,
    pub fee_paid: u128,
    /// Output per unit of input at execution
    pub exchange_rate: Ratio,
}

impl SwapPreview {
    pub fn compute(
        engine: &PricingEngine,
        reserves: &Reserves,
        direction: SwapDirection,
        input: u128,
        slippage_bps: u32,
    ) -> Result<Self> {
        let expected_output = engine.compute_swap_output(reserves, direction, input)?;
        let (reserve_in, _) = reserves.in_out(direction);

        let fee_paid = engine
            .fee()
            .fee_on(input)
            .ok_or_else(|| AmmError::overflow("fee"))?;
        let exchange_rate =
            Ratio::new(expected_output, input).ok_or(AmmError::InsufficientInput)?;

        Ok(Self {
            direction,
            input,
            expected_output,
            minimum_output: V2Math::apply_slippage(expected_output, slippage_bps),
            price_impact_bps: V2Math::calculate_price_impact_bps(input, reserve_in)?,
            fee_paid,
            exchange_rate,
        })
    }

    /// Exchange rate for display; `None` past the `Decimal` range
    pub fn exchange_rate_decimal(&self) -> Option<Decimal> {
        self.exchange_rate.to_decimal()
    }

    /// Price impact as a percentage, e.g. `9.09`
    pub fn price_impact_percent(&self) -> Decimal {
        Decimal::new(i64::from(self.price_impact_bps), 2)
    }
}
