//! Error types for unit conversion
//!
//! Parsing user-entered amounts ("1.5" ETH) into smallest-unit integers can
//! fail on malformed input, negative values, too many fractional digits or
//! values beyond `u128`.

use thiserror::Error;

/// Errors that can occur while converting between display strings and
/// smallest-unit integer amounts
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UnitsError {
    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// Amounts are unsigned
    #[error("Negative amount not allowed: '{input}'")]
    Negative { input: String },

    /// More fractional digits than the asset supports
    #[error("Precision loss: '{input}' has more than {decimals} fractional digits")]
    PrecisionLoss { input: String, decimals: u8 },

    /// Value exceeds the maximum representable amount
    #[error("Overflow: '{input}' exceeds maximum representable amount")]
    Overflow { input: String },

    /// Decimal count beyond what a u128 can scale
    #[error("Unsupported decimals: {decimals}")]
    UnsupportedDecimals { decimals: u8 },
}
