//! Reserve Ledger
//!
//! Holds the pool's two reserves and replaces them only as a pair. Every
//! commit is checked against the constant-product rules for its kind before
//! anything changes, so a rejected commit leaves the previous reserves in
//! place.

use crate::asset::{Asset, SwapDirection};
use crate::error::{AmmError, Result};
use serde::{Deserialize, Serialize};
use swap_types::U256;
use tracing::{debug, error};

/// Both reserves in smallest units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reserves {
    pub base: u128,
    pub quote: u128,
}

impl Reserves {
    pub const EMPTY: Self = Self { base: 0, quote: 0 };

    pub fn new(base: u128, quote: u128) -> Self {
        Self { base, quote }
    }

    /// An empty pool has both reserves at zero
    pub fn is_empty(&self) -> bool {
        self.base == 0 && self.quote == 0
    }

    /// Both reserves are positive
    pub fn is_initialized(&self) -> bool {
        self.base > 0 && self.quote > 0
    }

    /// Constant-product `k = base * quote`
    pub fn product(&self) -> U256 {
        U256::from(self.base) * U256::from(self.quote)
    }

    pub fn get(&self, asset: Asset) -> u128 {
        match asset {
            Asset::Base => self.base,
            Asset::Quote => self.quote,
        }
    }

    /// `(reserve_in, reserve_out)` for a swap direction
    pub fn in_out(&self, direction: SwapDirection) -> (u128, u128) {
        (
            self.get(direction.input_asset()),
            self.get(direction.output_asset()),
        )
    }

    /// Reserves after `input` enters and `output` leaves
    pub fn after_swap(&self, direction: SwapDirection, input: u128, output: u128) -> Result<Self> {
        let (reserve_in, reserve_out) = self.in_out(direction);
        let new_in = reserve_in
            .checked_add(input)
            .ok_or_else(|| AmmError::overflow("input reserve"))?;
        let new_out = reserve_out
            .checked_sub(output)
            .ok_or_else(|| AmmError::invariant("swap output exceeds reserve"))?;
        Ok(match direction {
            SwapDirection::BaseToQuote => Self::new(new_in, new_out),
            SwapDirection::QuoteToBase => Self::new(new_out, new_in),
        })
    }
}

/// Which rule a reserve update has to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// k must not decrease beyond the rounding tolerance
    Swap,
    /// Both reserves may only grow
    Deposit,
    /// Both reserves may only shrink
    Withdrawal,
}

/// Owner of the pool reserves
#[derive(Debug, Clone, Default)]
pub struct ReserveLedger {
    reserves: Reserves,
    rounding_tolerance: u128,
}

impl ReserveLedger {
    /// Empty ledger; `rounding_tolerance` is the largest k decrease a swap may cause
    pub fn new(rounding_tolerance: u128) -> Self {
        Self {
            reserves: Reserves::EMPTY,
            rounding_tolerance,
        }
    }

    /// Ledger seeded with existing reserves (snapshot restore)
    pub fn with_reserves(reserves: Reserves, rounding_tolerance: u128) -> Result<Self> {
        check_pairing(&reserves)?;
        Ok(Self {
            reserves,
            rounding_tolerance,
        })
    }

    /// `(base, quote)`; no side effects
    pub fn current_reserves(&self) -> (u128, u128) {
        (self.reserves.base, self.reserves.quote)
    }

    pub fn reserves(&self) -> Reserves {
        self.reserves
    }

    pub fn is_initialized(&self) -> bool {
        self.reserves.is_initialized()
    }

    pub fn rounding_tolerance(&self) -> u128 {
        self.rounding_tolerance
    }

    /// Check a proposed update without applying it
    pub fn validate(&self, next: &Reserves, kind: CommitKind) -> Result<()> {
        check_pairing(next)?;
        let current = &self.reserves;

        match kind {
            CommitKind::Swap => {
                if !current.is_initialized() {
                    return Err(AmmError::invariant("swap commit on an uninitialized pool"));
                }
                let floor = current
                    .product()
                    .saturating_sub(U256::from(self.rounding_tolerance));
                if next.product() < floor {
                    return Err(AmmError::invariant(format!(
                        "constant product decreased from {} to {}",
                        current.product(),
                        next.product()
                    )));
                }
            }
            CommitKind::Deposit => {
                if next.base < current.base || next.quote < current.quote {
                    return Err(AmmError::invariant("deposit would shrink a reserve"));
                }
            }
            CommitKind::Withdrawal => {
                if next.base > current.base || next.quote > current.quote {
                    return Err(AmmError::invariant("withdrawal would grow a reserve"));
                }
            }
        }
        Ok(())
    }

    /// Replace both reserves in one step
    pub fn commit(&mut self, new_base: u128, new_quote: u128, kind: CommitKind) -> Result<Reserves> {
        let next = Reserves::new(new_base, new_quote);
        if let Err(err) = self.validate(&next, kind) {
            error!(
                ?kind,
                current = ?self.reserves,
                proposed = ?next,
                error = %err,
                "reserve commit rejected"
            );
            return Err(err);
        }
        debug!(?kind, from = ?self.reserves, to = ?next, "reserves committed");
        self.reserves = next;
        Ok(next)
    }

    /// Restore reserves captured before a commit whose fund movement failed
    pub(crate) fn rollback(&mut self, previous: Reserves) {
        debug!(from = ?self.reserves, to = ?previous, "reserves rolled back");
        self.reserves = previous;
    }
}

fn check_pairing(reserves: &Reserves) -> Result<()> {
    if reserves.is_empty() || reserves.is_initialized() {
        Ok(())
    } else {
        Err(AmmError::invariant(format!(
            "one-sided reserves {}/{}",
            reserves.base, reserves.quote
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(base: u128, quote: u128) -> ReserveLedger {
        ReserveLedger::with_reserves(Reserves::new(base, quote), 0).unwrap()
    }

    #[test]
    fn test_swap_commit_requires_non_decreasing_product() {
        let mut ledger = seeded(1000, 2000);
        assert_eq!(
            ledger.commit(1100, 1819, CommitKind::Swap).unwrap(),
            Reserves::new(1100, 1819)
        );

        let err = ledger.commit(1100, 1800, CommitKind::Swap).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(ledger.current_reserves(), (1100, 1819));
    }

    #[test]
    fn test_rounding_tolerance_allows_small_decrease() {
        let mut ledger = ReserveLedger::with_reserves(Reserves::new(1000, 2000), 1000).unwrap();
        // k: 2_000_000 -> 1_999_998
        assert!(ledger.commit(1001, 1998, CommitKind::Swap).is_ok());
        // k: 1_999_998 -> 1_996_995
        assert!(ledger.commit(1001, 1995, CommitKind::Swap).is_err());
    }

    #[test]
    fn test_one_sided_reserves_rejected() {
        let mut ledger = ReserveLedger::new(0);
        assert!(ledger.commit(10, 0, CommitKind::Deposit).unwrap_err().is_fatal());
        assert!(ReserveLedger::with_reserves(Reserves::new(0, 5), 0).is_err());
    }

    #[test]
    fn test_swap_on_empty_pool_is_invariant_violation() {
        let ledger = ReserveLedger::new(0);
        assert!(ledger
            .validate(&Reserves::new(1, 1), CommitKind::Swap)
            .unwrap_err()
            .is_fatal());
    }

    #[test]
    fn test_deposit_and_withdrawal_directions() {
        let mut ledger = ReserveLedger::new(0);
        ledger.commit(1000, 2000, CommitKind::Deposit).unwrap();
        assert!(ledger.commit(900, 2100, CommitKind::Deposit).is_err());
        assert!(ledger.commit(1100, 2000, CommitKind::Withdrawal).is_err());
        ledger.commit(0, 0, CommitKind::Withdrawal).unwrap();
        assert!(!ledger.is_initialized());
    }

    #[test]
    fn test_after_swap_orders_reserves_by_direction() {
        let reserves = Reserves::new(1000, 2000);
        assert_eq!(
            reserves
                .after_swap(SwapDirection::BaseToQuote, 100, 181)
                .unwrap(),
            Reserves::new(1100, 1819)
        );
        assert_eq!(
            reserves
                .after_swap(SwapDirection::QuoteToBase, 200, 90)
                .unwrap(),
            Reserves::new(910, 2200)
        );
        assert!(reserves
            .after_swap(SwapDirection::BaseToQuote, u128::MAX, 1)
            .is_err());
    }
}
