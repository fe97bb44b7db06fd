//! In-memory price table implementing [`PriceOracle`].

use std::collections::HashMap;
use tracing::debug;

use crate::domain::config_validation::configured_price;
use crate::domain::error::TradeLedgerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceOracle;

/// Prices used when no `[prices]` section is configured.
pub const DEFAULT_PRICES: [(&str, f64); 3] = [("AAPL", 150.0), ("TSLA", 800.0), ("GOOGL", 2800.0)];

#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    prices: HashMap<String, f64>,
}

impl StaticPriceOracle {
    pub fn new(prices: HashMap<String, f64>) -> Self {
        Self { prices }
    }

    pub fn default_table() -> Self {
        Self::new(
            DEFAULT_PRICES
                .iter()
                .map(|&(symbol, price)| (symbol.to_string(), price))
                .collect(),
        )
    }

    /// Build from the `[prices]` section, symbols upper-cased. Falls back to
    /// [`DEFAULT_PRICES`] when the section is absent.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradeLedgerError> {
        let Some(keys) = config.section_keys("prices") else {
            debug!("no [prices] section, using default price table");
            return Ok(Self::default_table());
        };

        let mut prices = HashMap::with_capacity(keys.len());
        for key in keys {
            let price = configured_price(config, &key)?;
            prices.insert(key.to_uppercase(), price);
        }
        debug!(symbols = prices.len(), "loaded price table from config");
        Ok(Self::new(prices))
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    /// Known symbols in sorted order.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.prices.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl PriceOracle for StaticPriceOracle {
    fn price_of(&self, symbol: &str) -> f64 {
        self.prices.get(symbol).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn default_table_prices() {
        let oracle = StaticPriceOracle::default_table();
        assert_eq!(oracle.price_of("AAPL"), 150.0);
        assert_eq!(oracle.price_of("TSLA"), 800.0);
        assert_eq!(oracle.price_of("GOOGL"), 2800.0);
    }

    #[test]
    fn unknown_symbol_prices_at_zero() {
        let oracle = StaticPriceOracle::default_table();
        assert_eq!(oracle.price_of("MSFT"), 0.0);
        assert_eq!(oracle.price_of("aapl"), 0.0);
    }

    #[test]
    fn from_config_reads_prices_section() {
        let config =
            FileConfigAdapter::from_string("[prices]\naapl = 190.5\nMsft = 410\n").unwrap();
        let oracle = StaticPriceOracle::from_config(&config).unwrap();
        assert_eq!(oracle.price_of("AAPL"), 190.5);
        assert_eq!(oracle.price_of("MSFT"), 410.0);
        assert_eq!(oracle.price_of("TSLA"), 0.0);
        assert_eq!(oracle.symbols(), vec!["AAPL".to_string(), "MSFT".to_string()]);
    }

    #[test]
    fn from_config_without_section_uses_defaults() {
        let config = FileConfigAdapter::from_string("[account]\nid = a\n").unwrap();
        let oracle = StaticPriceOracle::from_config(&config).unwrap();
        assert_eq!(oracle.price_of("GOOGL"), 2800.0);
    }

    #[test]
    fn from_config_rejects_bad_price() {
        let config = FileConfigAdapter::from_string("[prices]\naapl = free\n").unwrap();
        let err = StaticPriceOracle::from_config(&config).unwrap_err();
        assert!(matches!(err, TradeLedgerError::ConfigInvalid { key, .. } if key == "aapl"));
    }

    #[test]
    fn with_price_overrides() {
        let oracle = StaticPriceOracle::default_table().with_price("AAPL", 1.0);
        assert_eq!(oracle.price_of("AAPL"), 1.0);
    }
}
