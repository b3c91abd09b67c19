// Simulated market reference data and events
pub mod asset;
pub mod catalog;
pub mod timeframe;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use asset::Asset;
pub use catalog::AssetCatalog;
pub use timeframe::Timeframe;

/// One point of a synthetic daily price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub price: Decimal,
    pub volume: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketEvent {
    PriceUpdate {
        asset_id: String,
        symbol: String,
        price: Decimal,
        timestamp: i64,
    },
}
