//! Pricing Engine
//!
//! Quotes the pool ratio and prices swaps under the constant-product rule.
//! [`PricingEngine::execute_swap`] is the only path that turns a price into
//! a reserve change, and it runs the custody protocol around the commit.

use crate::asset::SwapDirection;
use crate::custody::{CustodyGuard, Held};
use crate::error::{AmmError, Result};
use crate::fee::FeeRate;
use crate::reserves::{CommitKind, ReserveLedger, Reserves};
use crate::v2_math::V2Math;
use swap_types::{Address, Ratio};
use tracing::debug;

/// Result of a committed swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub input: u128,
    pub output: u128,
    pub reserves: Reserves,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PricingEngine {
    fee: FeeRate,
}

impl PricingEngine {
    pub fn new(fee: FeeRate) -> Self {
        Self { fee }
    }

    pub fn fee(&self) -> FeeRate {
        self.fee
    }

    /// Tokens per ETH, `reserve_quote / reserve_base`
    pub fn quote(&self, ledger: &ReserveLedger) -> Result<Ratio> {
        let reserves = ledger.reserves();
        if !reserves.is_initialized() {
            return Err(AmmError::PoolUninitialized);
        }
        Ratio::new(reserves.quote, reserves.base).ok_or(AmmError::PoolUninitialized)
    }

    /// Output for `input` against `reserves`, fee applied exactly
    pub fn compute_swap_output(
        &self,
        reserves: &Reserves,
        direction: SwapDirection,
        input: u128,
    ) -> Result<u128> {
        let (reserve_in, reserve_out) = reserves.in_out(direction);
        if input > 0 && reserve_in.checked_add(input).is_none() {
            return Err(AmmError::overflow("input reserve"));
        }
        V2Math::calculate_output_amount(input, reserve_in, reserve_out, self.fee)
    }

    /// Smallest input that buys at least `output`
    pub fn compute_swap_input(
        &self,
        reserves: &Reserves,
        direction: SwapDirection,
        output: u128,
    ) -> Result<u128> {
        let (reserve_in, reserve_out) = reserves.in_out(direction);
        V2Math::calculate_input_amount(output, reserve_in, reserve_out, self.fee)
    }

    /// Price, check slippage, take custody of the input, commit, pay out
    ///
    /// A failure at any step leaves reserves and both ledgers as they were.
    pub fn execute_swap(
        &self,
        ledger: &mut ReserveLedger,
        custody: &CustodyGuard,
        trader: &Address,
        direction: SwapDirection,
        input: u128,
        min_output: u128,
    ) -> Result<SwapOutcome> {
        let previous = ledger.reserves();
        let output = self.compute_swap_output(&previous, direction, input)?;
        if output < min_output {
            return Err(AmmError::SlippageExceeded {
                minimum: min_output,
                actual: output,
            });
        }

        let next = previous.after_swap(direction, input, output)?;
        ledger.validate(&next, CommitKind::Swap)?;

        let ticket = custody.authorize(trader, direction.input_asset(), input)?;
        let held = custody.take_custody(ticket)?;

        let reserves = match ledger.commit(next.base, next.quote, CommitKind::Swap) {
            Ok(reserves) => reserves,
            Err(err) => return Err(unwind(custody, held, err)),
        };

        if let Err(err) = custody.release(direction.output_asset(), trader, output) {
            debug!(?direction, output, error = %err, "swap payout failed, rolling back");
            ledger.rollback(previous);
            return Err(unwind(custody, held, err));
        }

        Ok(SwapOutcome {
            input,
            output,
            reserves,
        })
    }
}

/// Return held funds; a failed refund outranks the original error
pub(crate) fn unwind(custody: &CustodyGuard, held: Held, err: AmmError) -> AmmError {
    match custody.refund(held) {
        Ok(()) => err,
        Err(fatal) => fatal,
    }
}
