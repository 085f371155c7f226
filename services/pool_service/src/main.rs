use anyhow::{Context, Result};
use pool_service::{PoolService, Presenter};
use std::path::PathBuf;
use std::sync::Arc;
use swap_amm::{AssetLedger, TokenLedger};
use swap_config::EngineConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EngineConfig::load(config_path.as_deref())?;
    pool_service::logging::init(&config.logging)?;

    info!("🚀 Starting LiquiditySwap pool service...");

    let base: Arc<dyn AssetLedger> = Arc::new(TokenLedger::new(
        config.assets.base.symbol.clone(),
        config.assets.base.decimals,
    ));
    let quote: Arc<dyn AssetLedger> = Arc::new(TokenLedger::new(
        config.assets.quote.symbol.clone(),
        config.assets.quote.decimals,
    ));

    let service = PoolService::start(&config, base, quote).await?;
    let presenter = Presenter::new(&config);
    let (reserve_base, reserve_quote) = service.handle.current_reserves();
    info!(
        "📊 Reserves: {} / {}",
        presenter.amount(swap_amm::Asset::Base, reserve_base),
        presenter.amount(swap_amm::Asset::Quote, reserve_quote)
    );
    match service.handle.get_ratio() {
        Ok(ratio) => info!(
            "📊 Ratio: {} {} per {}",
            ratio, config.assets.quote.symbol, config.assets.base.symbol
        ),
        Err(err) => warn!("No ratio yet: {}", err),
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    service.stop(&config).await
}
