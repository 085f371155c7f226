//! Human-readable amounts and quotes
//!
//! Rounds smallest-unit amounts to the configured display precision and
//! labels them with asset symbols, the way the swap form shows balances.

use swap_amm::{Asset, SwapPreview};
use swap_config::{AssetSettings, EngineConfig};
use swap_types::format_display;

pub struct Presenter<'a> {
    config: &'a EngineConfig,
}

impl<'a> Presenter<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    fn settings(&self, asset: Asset) -> &AssetSettings {
        match asset {
            Asset::Base => &self.config.assets.base,
            Asset::Quote => &self.config.assets.quote,
        }
    }

    /// `1.235 ETH`
    pub fn amount(&self, asset: Asset, value: u128) -> String {
        let settings = self.settings(asset);
        format!(
            "{} {}",
            format_display(value, settings.decimals, self.config.client.display_decimals),
            settings.symbol
        )
    }

    /// `0.100 ETH -> 0.181 ImuLL (min 0.180 ImuLL, impact 9.09%)`
    pub fn preview(&self, preview: &SwapPreview) -> String {
        let input_asset = preview.direction.input_asset();
        let output_asset = preview.direction.output_asset();
        format!(
            "{} -> {} (min {}, impact {}%)",
            self.amount(input_asset, preview.input),
            self.amount(output_asset, preview.expected_output),
            self.amount(output_asset, preview.minimum_output),
            preview.price_impact_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swap_amm::{AmmPool, FeeRate, PoolView, Reserves, SwapDirection};

    #[test]
    fn test_amounts_use_display_precision() {
        let config = EngineConfig::default();
        let presenter = Presenter::new(&config);
        assert_eq!(
            presenter.amount(Asset::Base, 1_234_500_000_000_000_000),
            "1.235 ETH"
        );
        assert_eq!(presenter.amount(Asset::Quote, 0), "0.000 ImuLL");
    }

    #[test]
    fn test_preview_line() {
        let config = EngineConfig::default();
        let view = PoolView {
            reserves: Reserves::new(1_000_000_000_000_000_000, 2_000_000_000_000_000_000),
            total_shares: 1,
            fee: FeeRate::DEFAULT,
            sequence: 1,
        };
        let preview = view
            .preview_swap(SwapDirection::BaseToQuote, 100_000_000_000_000_000, 50)
            .unwrap();
        assert_eq!(
            Presenter::new(&config).preview(&preview),
            "0.100 ETH -> 0.181 ImuLL (min 0.180 ImuLL, impact 9.09%)"
        );
    }
}
