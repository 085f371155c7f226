//! Pool sides and swap directions

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the pair: `Base` is ETH, `Quote` is the ERC-20 token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Base,
    Quote,
}

impl Asset {
    pub fn other(self) -> Self {
        match self {
            Self::Base => Self::Quote,
            Self::Quote => Self::Base,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base asset"),
            Self::Quote => write!(f, "quote asset"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// ETH in, token out (`swapEthToToken`)
    BaseToQuote,
    /// Token in, ETH out (`swapTokenToEth`)
    QuoteToBase,
}

impl SwapDirection {
    pub fn input_asset(self) -> Asset {
        match self {
            Self::BaseToQuote => Asset::Base,
            Self::QuoteToBase => Asset::Quote,
        }
    }

    pub fn output_asset(self) -> Asset {
        self.input_asset().other()
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::BaseToQuote => Self::QuoteToBase,
            Self::QuoteToBase => Self::BaseToQuote,
        }
    }
}
