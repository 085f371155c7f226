//! # LiquiditySwap Shared Types
//!
//! Value types shared by the AMM engine, its configuration and the pool
//! service.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: reserve amounts are integers in the asset's smallest unit
//! - **Exact Ratios**: prices are rationals of two integers, never floats
//! - **Clear Boundaries**: `Decimal`/`f64` conversions exist only for display
//!
//! ## Quick Start
//!
//! ```rust
//! use swap_types::{format_ether, parse_ether, Ratio};
//!
//! let wei = parse_ether("1.5").unwrap();
//! assert_eq!(wei, 1_500_000_000_000_000_000);
//! assert_eq!(format_ether(wei), "1.5");
//!
//! // 2000 tokens per 1000 wei
//! let ratio = Ratio::new(2000, 1000).unwrap();
//! assert_eq!(ratio.apply(10), Some(20));
//! ```

#[cfg(feature = "common")]
pub mod common;

#[cfg(feature = "common")]
pub use common::address::{shorten, shorten_address, Address};
#[cfg(feature = "common")]
pub use common::errors::UnitsError;
#[cfg(feature = "common")]
pub use common::ratio::Ratio;
#[cfg(feature = "common")]
pub use common::units::{
    format_display, format_ether, format_units, parse_ether, parse_units, ETHER_DECIMALS,
};
#[cfg(feature = "common")]
pub use common::wide::{mul_div_ceil, mul_div_floor, wide_mul_div_floor, U256};
