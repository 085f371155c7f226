//! Engine error taxonomy
//!
//! Every variant is terminal for the requested operation. The engine never
//! retries, and any failure leaves reserves, shares and balances as they
//! were before the call.

use crate::asset::Asset;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AmmError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("Pool is not initialized: reserves are empty")]
    PoolUninitialized,

    #[error("Input amount must be positive")]
    InsufficientInput,

    #[error("Insufficient liquidity: output {output} against reserve {reserve_out}")]
    InsufficientLiquidity { output: u128, reserve_out: u128 },

    #[error("Slippage exceeded: output {actual} is below minimum {minimum}")]
    SlippageExceeded { minimum: u128, actual: u128 },

    #[error("Deposit amounts are both zero")]
    ZeroDeposit,

    #[error("Deposit too small: no shares would be issued")]
    DepositTooSmall,

    #[error("Unauthorized: allowance {granted} is below required {required}")]
    Unauthorized { required: u128, granted: u128 },

    #[error("Transfer of {asset} failed: {reason}")]
    TransferFailed { asset: Asset, reason: String },

    #[error("Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u128, available: u128 },

    #[error("Withdrawal too small: both amounts round to zero")]
    WithdrawalTooSmall,

    #[error("Invalid fee {numerator}/{denominator}")]
    InvalidFee { numerator: u32, denominator: u32 },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    #[error("Snapshot error: {reason}")]
    Snapshot { reason: String },
}

impl AmmError {
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: &'static str) -> Self {
        Self::ArithmeticOverflow { context }
    }

    /// Invariant violations point at a bug in fee or rounding arithmetic
    /// rather than a bad request and should raise an alarm
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }
}

impl From<bincode::Error> for AmmError {
    fn from(err: bincode::Error) -> Self {
        Self::Snapshot {
            reason: err.to_string(),
        }
    }
}
