//! # LiquiditySwap AMM Engine
//!
//! ## Purpose
//!
//! Constant-product market maker for a single ETH ⇄ ERC-20 pair. Quotes the
//! pool ratio, prices and executes swaps in both directions, and accounts
//! for liquidity shares, with every reserve change checked against the
//! `x * y = k` invariant before it lands.
//!
//! ## Components
//!
//! - [`ReserveLedger`]: the two reserves, replaced only as a pair
//! - [`PricingEngine`]: ratio quotes and fee-exact swap math ([`V2Math`])
//! - [`LiquidityBook`]: ratio-preserving deposits, pro-rata withdrawals
//! - [`CustodyGuard`]: two-phase, allowance-checked custody of input funds
//! - [`Pool`]: the contract-shaped facade composing the four
//!
//! ## Precision
//!
//! Amounts are `u128` smallest units with `U256` intermediates. Outputs round
//! down and required inputs round up, so rounding always favors the pool.
//! `Decimal` appears only in [`SwapPreview`] display helpers.
//!
//! ```rust
//! use std::sync::Arc;
//! use swap_amm::{Pool, PoolSettings, TokenLedger};
//! use swap_types::Address;
//!
//! let eth = Arc::new(TokenLedger::native());
//! let token = Arc::new(TokenLedger::new("ImuLL", 18));
//! let account = Address::from_low_u64_be(0xdead);
//! let provider = Address::from_low_u64_be(1);
//!
//! eth.mint(&provider, 1000).unwrap();
//! token.mint(&provider, 2000).unwrap();
//!
//! let mut pool = Pool::new(PoolSettings::new(account), eth, token);
//! pool.approve(&provider, &account, 2000);
//! pool.add_liquidity(&provider, 2000, 1000).unwrap();
//! assert_eq!(pool.get_ratio().unwrap().floor(), 2);
//! ```

pub mod asset;
pub mod custody;
pub mod error;
pub mod events;
pub mod fee;
pub mod ledger;
pub mod liquidity;
pub mod pool;
pub mod pool_traits;
pub mod preview;
pub mod pricing;
pub mod reserves;
pub mod state;
pub mod v2_math;

pub use asset::{Asset, SwapDirection};
pub use custody::{CustodyGuard, CustodyMode, CustodyTicket, Held};
pub use error::{AmmError, Result};
pub use events::PoolEvent;
pub use fee::FeeRate;
pub use ledger::{AssetLedger, LedgerError, TokenLedger};
pub use liquidity::{DepositQuote, LiquidityBook, WithdrawalQuote};
pub use pool::{DepositReceipt, Pool, PoolSettings, PoolView, SwapReceipt, WithdrawalReceipt};
pub use pool_traits::AmmPool;
pub use preview::{SwapPreview, DEFAULT_SLIPPAGE_BPS};
pub use pricing::{PricingEngine, SwapOutcome};
pub use reserves::{CommitKind, ReserveLedger, Reserves};
pub use state::{PoolState, Stateful};
pub use v2_math::V2Math;

/// Common types for AMM calculations
pub use swap_types::{Address, Ratio, U256};
