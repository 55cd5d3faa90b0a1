//! Producer configuration
//!
//! `SimConfig` is the ground truth for a producer run: an immutable
//! aggregate loaded from a TOML document and validated up front. Unknown
//! fields in the document are rejected so a typo cannot silently fall back
//! to a default.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use types::numeric::Price;
use types::symbol::Symbol;

/// Initial price used for symbols the config does not list: $100.0000.
pub const DEFAULT_INITIAL_PRICE: Price = Price::from_raw(1_000_000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config lists no symbols")]
    EmptySymbols,

    #[error("messages_per_second must be positive")]
    ZeroRate,

    #[error("duration_seconds must be positive")]
    ZeroDuration,

    #[error("initial price given for unlisted symbol {0}")]
    UnknownSymbolPrice(Symbol),
}

/// Everything the producer's behavior is determined by.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub multicast_address: Ipv4Addr,
    pub port: u16,
    pub symbols: Vec<Symbol>,
    pub messages_per_second: u32,
    pub duration_seconds: u64,
    pub seed: u64,
    /// Map from symbol to raw fixed-point starting price.
    #[serde(default)]
    pub initial_prices: HashMap<Symbol, Price>,
}

impl SimConfig {
    /// Load and validate a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field invariants the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbols);
        }
        if self.messages_per_second == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.duration_seconds == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        for symbol in self.initial_prices.keys() {
            if !self.symbols.contains(symbol) {
                return Err(ConfigError::UnknownSymbolPrice(*symbol));
            }
        }
        Ok(())
    }

    /// Starting price for `symbol`, falling back to the default.
    pub fn initial_price(&self, symbol: Symbol) -> Price {
        self.initial_prices
            .get(&symbol)
            .copied()
            .unwrap_or(DEFAULT_INITIAL_PRICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_toml() -> &'static str {
        r#"
            multicast_address = "239.1.1.1"
            port = 12345
            symbols = ["AAPL", "TSLA", "MSFT"]
            messages_per_second = 100000
            duration_seconds = 10
            seed = 42

            [initial_prices]
            AAPL = 1850000
            TSLA = 2500000
        "#
    }

    #[test]
    fn test_load_sample_config() {
        let config = SimConfig::from_toml(sample_toml()).unwrap();
        assert_eq!(config.multicast_address, Ipv4Addr::new(239, 1, 1, 1));
        assert_eq!(config.symbols.len(), 3);
        assert_eq!(config.seed, 42);
        assert_eq!(
            config.initial_price(Symbol::new("AAPL")),
            Price::from_raw(1_850_000)
        );
        // No entry: default applies.
        assert_eq!(
            config.initial_price(Symbol::new("MSFT")),
            DEFAULT_INITIAL_PRICE
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = format!("{}\nretransmit = true\n", sample_toml());
        assert!(SimConfig::from_toml(&text).is_err());
    }

    #[test]
    fn test_empty_symbols_rejected() {
        let text = r#"
            multicast_address = "239.1.1.1"
            port = 12345
            symbols = []
            messages_per_second = 1000
            duration_seconds = 1
            seed = 1
        "#;
        assert!(matches!(
            SimConfig::from_toml(text),
            Err(ConfigError::EmptySymbols)
        ));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let text = r#"
            multicast_address = "239.1.1.1"
            port = 12345
            symbols = ["AAPL"]
            messages_per_second = 0
            duration_seconds = 1
            seed = 1
        "#;
        assert!(matches!(
            SimConfig::from_toml(text),
            Err(ConfigError::ZeroRate)
        ));
    }

    #[test]
    fn test_price_for_unlisted_symbol_rejected() {
        let text = r#"
            multicast_address = "239.1.1.1"
            port = 12345
            symbols = ["AAPL"]
            messages_per_second = 1000
            duration_seconds = 1
            seed = 1

            [initial_prices]
            TSLA = 2500000
        "#;
        assert!(matches!(
            SimConfig::from_toml(text),
            Err(ConfigError::UnknownSymbolPrice(_))
        ));
    }

    #[test]
    fn test_over_length_symbol_rejected() {
        let text = r#"
            multicast_address = "239.1.1.1"
            port = 12345
            symbols = ["TOOLONGNAME"]
            messages_per_second = 1000
            duration_seconds = 1
            seed = 1
        "#;
        assert!(SimConfig::from_toml(text).is_err());
    }
}
