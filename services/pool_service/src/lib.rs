//! # Pool Service
//!
//! Runs a LiquiditySwap pool as a single tokio task. State-changing
//! requests (swaps, deposits, withdrawals, restores) are queued on a bounded
//! channel and applied one at a time; each caller gets its receipt back on a
//! oneshot channel. Ratio and reserve reads never touch the queue: they copy
//! the [`swap_amm::PoolView`] the actor publishes after every command.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pool_service::PoolService;
//! use swap_amm::TokenLedger;
//! use swap_config::EngineConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = EngineConfig::load(None)?;
//! pool_service::logging::init(&config.logging)?;
//!
//! let eth = Arc::new(TokenLedger::native());
//! let token = Arc::new(TokenLedger::new("ImuLL", 18));
//! let service = PoolService::start(&config, eth, token).await?;
//! println!("ratio: {:?}", service.handle.get_ratio());
//! service.stop(&config).await
//! # }
//! ```

mod actor;
mod command;
pub mod display;
pub mod error;
pub mod handle;
pub mod logging;
pub mod service;
pub mod snapshot;

pub use display::Presenter;
pub use error::{Result, ServiceError};
pub use handle::PoolHandle;
pub use service::{pool_settings, PoolService};
