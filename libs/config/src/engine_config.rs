//! Engine Configuration Module
//!
//! Loads the pool, asset, client, service and logging settings from a TOML
//! file with `LIQUIDITYSWAP__*` environment overrides. Every section has
//! defaults, so a missing file still yields a usable configuration.

use crate::defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use swap_types::Address;
use tracing::{debug, info, warn};

/// Main engine configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub pool: PoolConfig,
    pub assets: AssetsConfig,
    pub client: ClientConfig,
    pub service: ServiceSettings,
    pub logging: LoggingConfig,
}

/// Pool parameters
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PoolConfig {
    pub fee_numerator: u32,
    pub fee_denominator: u32,
    /// Largest decrease of k a swap may cause through rounding
    pub rounding_tolerance: u64,
    /// Account holding the pool's funds, hex
    pub address: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            fee_numerator: defaults::pool::FEE_NUMERATOR,
            fee_denominator: defaults::pool::FEE_DENOMINATOR,
            rounding_tolerance: defaults::pool::ROUNDING_TOLERANCE,
            address: defaults::pool::ADDRESS.to_string(),
        }
    }
}

impl PoolConfig {
    pub fn pool_address(&self) -> Result<Address> {
        parse_address(&self.address).context("Invalid pool address")
    }
}

/// Display metadata of one asset
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetSettings {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    /// Token contract, absent for the native currency
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    pub base: AssetSettings,
    pub quote: AssetSettings,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base: AssetSettings {
                symbol: defaults::assets::BASE_SYMBOL.to_string(),
                name: defaults::assets::BASE_NAME.to_string(),
                decimals: defaults::assets::DECIMALS,
                address: None,
            },
            quote: AssetSettings {
                symbol: defaults::assets::QUOTE_SYMBOL.to_string(),
                name: defaults::assets::QUOTE_NAME.to_string(),
                decimals: defaults::assets::DECIMALS,
                address: Some(defaults::assets::QUOTE_ADDRESS.to_string()),
            },
        }
    }
}

/// Presentation settings for swap previews and balances
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub default_slippage_bps: u32,
    pub display_decimals: u8,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_slippage_bps: defaults::client::SLIPPAGE_BPS,
            display_decimals: defaults::client::DISPLAY_DECIMALS,
        }
    }
}

/// Pool service settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceSettings {
    pub command_queue_size: usize,
    /// Snapshot file; `~` and `$VARS` are expanded on load
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            command_queue_size: defaults::service::COMMAND_QUEUE_SIZE,
            snapshot_path: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `swap_amm=debug`
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file with environment overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. A file that exists but does not parse is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or(Path::new(defaults::CONFIG_PATH));

        let mut builder = Config::builder();
        if path.exists() {
            info!("Loading engine config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            warn!("Engine config not found: {:?}, using defaults", path);
        }

        // Override with environment variables (LIQUIDITYSWAP__ prefix)
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .separator(defaults::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        let mut engine: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        engine.expand_env_vars()?;
        engine.validate()?;
        debug!(?engine, "engine config loaded");
        Ok(engine)
    }

    /// Expand `~` and environment variables in path values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        if let Some(path) = &self.service.snapshot_path {
            let raw = path.to_string_lossy();
            let expanded =
                shellexpand::full(&raw).context("Failed to expand snapshot path")?;
            self.service.snapshot_path = Some(PathBuf::from(expanded.as_ref()));
        }
        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let pool = &self.pool;
        if pool.fee_denominator == 0 || pool.fee_numerator >= pool.fee_denominator {
            bail!(
                "Invalid fee {}/{}: numerator must be below a non-zero denominator",
                pool.fee_numerator,
                pool.fee_denominator
            );
        }
        pool.pool_address()?;
        if self.service.command_queue_size == 0 {
            bail!("command_queue_size must be positive");
        }
        if self.client.default_slippage_bps > 10_000 {
            bail!(
                "default_slippage_bps {} exceeds 100%",
                self.client.default_slippage_bps
            );
        }
        Ok(())
    }

    /// Render as TOML, the format [`EngineConfig::load`] reads
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn parse_address(text: &str) -> Result<Address> {
    let hex = text.strip_prefix("0x").unwrap_or(text);
    if hex.len() != 40 {
        bail!("expected 20 bytes of hex, got {:?}", text);
    }
    Address::from_str(hex).with_context(|| format!("not hex: {:?}", text))
}

/// Convenience function to load configuration from the default path
pub fn load_config() -> Result<EngineConfig> {
    EngineConfig::load(None)
}
