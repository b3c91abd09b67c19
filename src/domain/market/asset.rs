use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A simulated tradable cryptocurrency.
///
/// Everything except `price` and the 24h change fields is reference data.
/// The price simulator mutates those three in place on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: Decimal,
    #[serde(default)]
    pub change_24h: Decimal,
    #[serde(default)]
    pub change_percent_24h: Decimal,
    #[serde(default)]
    pub market_cap: Decimal,
    #[serde(default)]
    pub volume_24h: Decimal,
    pub rank: u32,
    #[serde(default)]
    pub icon: String,
}

impl Asset {
    /// True when the symbol is in the given stablecoin set (case-insensitive)
    pub fn is_stablecoin(&self, stable_symbols: &[String]) -> bool {
        stable_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&self.symbol))
    }
}
