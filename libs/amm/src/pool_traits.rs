//! Read-only pricing interface shared by live pools and their snapshots

use crate::asset::SwapDirection;
use crate::error::{AmmError, Result};
use crate::fee::FeeRate;
use crate::preview::SwapPreview;
use crate::pricing::PricingEngine;
use crate::reserves::Reserves;
use swap_types::Ratio;

/// Unified pool interface for quoting
pub trait AmmPool {
    /// Current reserves
    fn reserves(&self) -> Reserves;

    /// Get fee tier
    fn fee(&self) -> FeeRate;

    /// Calculate output amount for given input
    fn get_amount_out(&self, direction: SwapDirection, amount_in: u128) -> Result<u128> {
        PricingEngine::new(self.fee()).compute_swap_output(&self.reserves(), direction, amount_in)
    }

    /// Calculate required input for desired output
    fn get_amount_in(&self, direction: SwapDirection, amount_out: u128) -> Result<u128> {
        PricingEngine::new(self.fee()).compute_swap_input(&self.reserves(), direction, amount_out)
    }

    /// `(base, quote)` reserves
    fn get_liquidity(&self) -> (u128, u128) {
        let reserves = self.reserves();
        (reserves.base, reserves.quote)
    }

    /// Tokens per ETH
    fn spot_ratio(&self) -> Result<Ratio> {
        let reserves = self.reserves();
        if !reserves.is_initialized() {
            return Err(AmmError::PoolUninitialized);
        }
        Ratio::new(reserves.quote, reserves.base).ok_or(AmmError::PoolUninitialized)
    }

    fn preview_swap(
        &self,
        direction: SwapDirection,
        input: u128,
        slippage_bps: u32,
    ) -> Result<SwapPreview> {
        SwapPreview::compute(
            &PricingEngine::new(self.fee()),
            &self.reserves(),
            direction,
            input,
            slippage_bps,
        )
    }
}
