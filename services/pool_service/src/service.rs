//! Building a running pool from configuration

use crate::handle::PoolHandle;
use crate::snapshot;
use anyhow::{Context, Result};
use std::sync::Arc;
use swap_amm::{AssetLedger, FeeRate, Pool, PoolSettings};
use swap_config::EngineConfig;
use tokio::task::JoinHandle;
use tracing::info;

/// Pool parameters from the `[pool]` section
pub fn pool_settings(config: &EngineConfig) -> Result<PoolSettings> {
    let fee = FeeRate::new(config.pool.fee_numerator, config.pool.fee_denominator)
        .context("Invalid pool fee")?;
    Ok(PoolSettings {
        account: config.pool.pool_address()?,
        fee,
        rounding_tolerance: u128::from(config.pool.rounding_tolerance),
    })
}

/// Running pool actor plus its task
pub struct PoolService {
    pub handle: PoolHandle,
    pub task: JoinHandle<()>,
}

impl PoolService {
    /// Create the pool, restore the configured snapshot if present, spawn the actor
    pub async fn start(
        config: &EngineConfig,
        base_ledger: Arc<dyn AssetLedger>,
        quote_ledger: Arc<dyn AssetLedger>,
    ) -> Result<Self> {
        let settings = pool_settings(config)?;
        let mut pool = Pool::new(settings, base_ledger, quote_ledger);

        if let Some(path) = &config.service.snapshot_path {
            if let Some(state) = snapshot::load(path).await? {
                pool.restore_state(state)
                    .with_context(|| format!("Snapshot {:?} failed validation", path))?;
            }
        }

        let (handle, task) = PoolHandle::spawn(pool, config.service.command_queue_size);
        info!(
            "✅ Pool service started: fee {}, reserves {:?}",
            settings.fee,
            handle.current_reserves()
        );
        Ok(Self { handle, task })
    }

    /// Drain the queue, stop the actor and persist its final state when configured
    pub async fn stop(self, config: &EngineConfig) -> Result<()> {
        let state = self
            .handle
            .shutdown()
            .await
            .context("Pool actor already stopped")?;
        self.task.await.context("Pool actor task panicked")?;
        if let Some(path) = &config.service.snapshot_path {
            snapshot::save(path, &state).await?;
        }
        info!("Pool service stopped at sequence {}", state.sequence);
        Ok(())
    }
}
