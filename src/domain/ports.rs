use crate::domain::market::{Asset, ChartPoint, MarketEvent};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::mpsc::Receiver;

/// Source of live asset prices and synthetic history
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Receive a `PriceUpdate` for every asset on every tick
    async fn subscribe(&self) -> Result<Receiver<MarketEvent>>;

    /// Snapshot of all assets, ordered by rank
    async fn get_assets(&self) -> Result<Vec<Asset>>;

    /// Resolve an asset by id (or symbol) with its current price
    async fn get_asset(&self, key: &str) -> Result<Option<Asset>>;

    /// Current price per asset id
    async fn get_prices(&self) -> Result<HashMap<String, Decimal>>;

    /// Daily history of `days + 1` points ending at the live price
    async fn get_historical_series(&self, asset_id: &str, days: u32) -> Result<Vec<ChartPoint>>;
}
