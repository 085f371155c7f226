//! # LiquiditySwap Configuration
//!
//! Configuration loading and defaults for the AMM engine and the pool
//! service.
//!
//! ## Features
//!
//! - **Pool Parameters**: fee rational, rounding tolerance, pool account
//! - **Asset Metadata**: symbols, names and decimals for ETH and the token
//! - **Client Defaults**: slippage tolerance and display precision
//! - **Service Settings**: command queue size, snapshot path, logging
//!
//! ## Usage
//!
//! ```rust
//! use swap_config::{defaults, EngineConfig};
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.pool.fee_numerator, defaults::pool::FEE_NUMERATOR);
//! assert_eq!(config.client.default_slippage_bps, 50);
//! ```

pub mod defaults;
pub mod engine_config;

// Re-export commonly used types
pub use engine_config::{
    load_config, AssetSettings, AssetsConfig, ClientConfig, EngineConfig, LoggingConfig,
    PoolConfig, ServiceSettings,
};
