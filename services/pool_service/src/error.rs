//! Pool service errors

use swap_amm::AmmError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The engine rejected the command; pool state is unchanged
    #[error(transparent)]
    Amm(#[from] AmmError),

    #[error("Pool actor stopped")]
    PoolStopped,
}

impl ServiceError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Amm(err) if err.is_fatal())
    }

    /// The engine error behind this failure, if any
    pub fn as_amm(&self) -> Option<&AmmError> {
        match self {
            Self::Amm(err) => Some(err),
            _ => None,
        }
    }
}
