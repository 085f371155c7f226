//! Events emitted by committed pool operations

use crate::asset::SwapDirection;
use crate::reserves::Reserves;
use serde::{Deserialize, Serialize};
use swap_types::Address;

/// One committed state change; the pool keeps no history of these
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    Swap {
        trader: Address,
        direction: SwapDirection,
        input: u128,
        output: u128,
        reserves: Reserves,
    },
    Mint {
        owner: Address,
        base: u128,
        quote: u128,
        shares: u128,
        reserves: Reserves,
    },
    Burn {
        owner: Address,
        base: u128,
        quote: u128,
        shares: u128,
        reserves: Reserves,
    },
}

impl PoolEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Swap { .. } => "swap",
            Self::Mint { .. } => "mint",
            Self::Burn { .. } => "burn",
        }
    }

    /// Reserves right after the event
    pub fn reserves(&self) -> Reserves {
        match self {
            Self::Swap { reserves, .. }
            | Self::Mint { reserves, .. }
            | Self::Burn { reserves, .. } => *reserves,
        }
    }
}
