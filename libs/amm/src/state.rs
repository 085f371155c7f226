//! Pool snapshots
//!
//! A snapshot carries reserves, shares and positions. Restoring one checks
//! the same invariants every commit keeps before any of it is installed.

use crate::error::{AmmError, Result};
use crate::liquidity::LiquidityBook;
use crate::reserves::{ReserveLedger, Reserves};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swap_types::Address;

/// Core trait for components that can be snapshotted and restored
pub trait Stateful {
    /// Error type for failed operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a snapshot of the current state
    fn snapshot(&self) -> std::result::Result<Vec<u8>, Self::Error>;

    /// Restore state from a snapshot; on error the current state is kept
    fn restore(&mut self, snapshot: &[u8]) -> std::result::Result<(), Self::Error>;
}

/// Persisted layout of a pool
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    /// Number of operations committed so far
    pub sequence: u64,
    pub reserve_base: u128,
    pub reserve_quote: u128,
    pub total_shares: u128,
    pub positions: BTreeMap<Address, u128>,
}

impl PoolState {
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn reserves(&self) -> Reserves {
        Reserves::new(self.reserve_base, self.reserve_quote)
    }

    /// Check the snapshot and rebuild the ledger and book it describes
    pub(crate) fn into_parts(
        self,
        rounding_tolerance: u128,
    ) -> Result<(ReserveLedger, LiquidityBook)> {
        let ledger = ReserveLedger::with_reserves(self.reserves(), rounding_tolerance)?;
        let book = LiquidityBook::from_positions(self.positions)?;
        if book.total_shares() != self.total_shares {
            return Err(AmmError::invariant(format!(
                "positions sum to {} but total shares is {}",
                book.total_shares(),
                self.total_shares
            )));
        }
        book.check_consistent(&ledger.reserves())?;
        Ok((ledger, book))
    }
}
