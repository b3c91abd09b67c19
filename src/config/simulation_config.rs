//! Price simulation configuration parsing from environment variables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use std::str::FromStr;

/// Simulation environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEnvConfig {
    pub tick_interval_ms: u64,
    /// Symbols that get the narrow stablecoin band
    pub stable_symbols: Vec<String>,
    /// Full width of the per-tick band for stablecoins (0.001 = ±0.05%)
    pub stable_tick_volatility: f64,
    /// Full width of the per-tick band for everything else (0.02 = ±1%)
    pub tick_volatility: f64,
    /// Lowest price a random walk may reach
    pub price_floor: Decimal,
    pub chart_anchor_symbol: String,
    pub chart_anchor_volatility: f64,
    pub chart_volatility: f64,
    pub catalog_path: Option<PathBuf>,
}

impl Default for SimulationEnvConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
            stable_symbols: vec!["USDT".to_string(), "USDC".to_string()],
            stable_tick_volatility: 0.001,
            tick_volatility: 0.02,
            price_floor: dec!(0.00000001),
            chart_anchor_symbol: "BTC".to_string(),
            chart_anchor_volatility: 0.05,
            chart_volatility: 0.08,
            catalog_path: None,
        }
    }
}

impl SimulationEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let parse_f64 = |key: &str, default: f64| {
            lookup(key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(default)
        };

        let tick_interval_ms = lookup("TICK_INTERVAL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.tick_interval_ms);

        let stable_symbols = lookup("STABLECOIN_SYMBOLS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<String>>()
            })
            .unwrap_or(defaults.stable_symbols);

        let price_floor = lookup("PRICE_FLOOR")
            .and_then(|v| Decimal::from_str(v.trim()).ok())
            .filter(|v| *v > Decimal::ZERO)
            .unwrap_or(defaults.price_floor);

        Self {
            tick_interval_ms,
            stable_symbols,
            stable_tick_volatility: parse_f64("STABLE_TICK_VOLATILITY", defaults.stable_tick_volatility),
            tick_volatility: parse_f64("TICK_VOLATILITY", defaults.tick_volatility),
            price_floor,
            chart_anchor_symbol: lookup("CHART_ANCHOR_SYMBOL")
                .map(|v| v.trim().to_uppercase())
                .unwrap_or(defaults.chart_anchor_symbol),
            chart_anchor_volatility: parse_f64("CHART_ANCHOR_VOLATILITY", defaults.chart_anchor_volatility),
            chart_volatility: parse_f64("CHART_VOLATILITY", defaults.chart_volatility),
            catalog_path: lookup("CATALOG_PATH").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_simulation_config_defaults() {
        let config = SimulationEnvConfig::from_lookup(|_| None);
        assert_eq!(config, SimulationEnvConfig::default());
        assert_eq!(config.tick_interval_ms, 3000);
        assert_eq!(config.stable_symbols, vec!["USDT", "USDC"]);
    }

    #[test]
    fn test_simulation_config_overrides() {
        let vars = HashMap::from([
            ("TICK_INTERVAL_MS", "2000"),
            ("STABLECOIN_SYMBOLS", "usdt, dai ,"),
            ("PRICE_FLOOR", "0.01"),
            ("TICK_VOLATILITY", "-1"),
            ("CATALOG_PATH", "/tmp/catalog.toml"),
        ]);
        let config = SimulationEnvConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.tick_interval_ms, 2000);
        assert_eq!(config.stable_symbols, vec!["USDT", "DAI"]);
        assert_eq!(config.price_floor, dec!(0.01));
        // Negative volatility is ignored
        assert_eq!(config.tick_volatility, 0.02);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.toml")));
    }
}
