//! Default configuration values
//!
//! Constants used when a configuration file or environment variable does not
//! set a value.

/// Pool defaults
pub mod pool {
    /// 0.3% swap fee
    pub const FEE_NUMERATOR: u32 = 30;
    pub const FEE_DENOMINATOR: u32 = 10_000;

    /// Swap commits may not decrease k at all
    pub const ROUNDING_TOLERANCE: u64 = 0;

    /// Account holding the pool's funds
    pub const ADDRESS: &str = "0x920977dc3862cf8549425728Cc56b36c5a012f39";
}

/// Asset defaults
pub mod assets {
    pub const BASE_SYMBOL: &str = "ETH";
    pub const BASE_NAME: &str = "Ethereum";

    pub const QUOTE_SYMBOL: &str = "ImuLL";
    pub const QUOTE_NAME: &str = "ImuLL token";
    pub const QUOTE_ADDRESS: &str = "0xf0dcFeA06962313d2963d7Ff9CA49b43B3dAa62b";

    pub const DECIMALS: u8 = 18;
}

/// Client presentation defaults
pub mod client {
    /// Slippage tolerance (0.5%)
    pub const SLIPPAGE_BPS: u32 = 50;

    /// Fractional digits shown for balances and quotes
    pub const DISPLAY_DECIMALS: u8 = 3;
}

/// Pool service defaults
pub mod service {
    /// Command queue size per pool actor
    pub const COMMAND_QUEUE_SIZE: usize = 1024;
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";
}

/// Environment variable prefix; nested keys use `__`, e.g.
/// `LIQUIDITYSWAP__POOL__FEE_NUMERATOR`
pub const ENV_PREFIX: &str = "LIQUIDITYSWAP";
pub const ENV_SEPARATOR: &str = "__";

/// Configuration file read when no path is given
pub const CONFIG_PATH: &str = "config/liquidityswap.toml";
