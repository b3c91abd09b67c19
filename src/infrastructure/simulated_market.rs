use crate::application::market::{ChartGenerator, PriceChange, PriceSimulator};
use crate::config::SimulationEnvConfig;
use crate::domain::market::{Asset, AssetCatalog, ChartPoint, MarketEvent};
use crate::domain::ports::MarketDataService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{
    RwLock,
    mpsc::{self, Receiver, Sender, error::TrySendError},
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const SUBSCRIBER_BUFFER: usize = 256;

/// In-process market: a live asset catalog whose prices random-walk on
/// every tick.
#[derive(Clone)]
pub struct SimulatedMarketDataService {
    catalog: Arc<RwLock<AssetCatalog>>,
    simulator: PriceSimulator,
    charts: ChartGenerator,
    subscribers: Arc<RwLock<Vec<Sender<MarketEvent>>>>,
}

impl SimulatedMarketDataService {
    pub fn new(catalog: AssetCatalog, config: &SimulationEnvConfig) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(catalog)),
            simulator: PriceSimulator::new(config),
            charts: ChartGenerator::new(config),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Built-in catalog, or the TOML file named by `CATALOG_PATH`
    pub fn from_config(config: &SimulationEnvConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let catalog = AssetCatalog::load(path)?;
                info!(
                    "SimulatedMarketDataService: Loaded {} assets from {:?}",
                    catalog.len(),
                    path
                );
                catalog
            }
            None => AssetCatalog::default(),
        };
        Ok(Self::new(catalog, config))
    }

    /// Copy of the live catalog
    pub async fn snapshot(&self) -> AssetCatalog {
        self.catalog.read().await.clone()
    }

    /// Advance every price by one step using the thread RNG
    pub async fn tick(&self) -> Vec<PriceChange> {
        let changes = {
            let mut catalog = self.catalog.write().await;
            let mut rng = rand::rng();
            self.simulator.tick(&mut catalog, &mut rng)
        };
        self.publish_changes(&changes).await;
        changes
    }

    /// Advance every price with a caller-supplied RNG
    pub async fn tick_with<R: Rng + Send + ?Sized>(&self, rng: &mut R) -> Vec<PriceChange> {
        let changes = {
            let mut catalog = self.catalog.write().await;
            self.simulator.tick(&mut catalog, rng)
        };
        self.publish_changes(&changes).await;
        changes
    }

    /// Pin an asset's price. Used by tests and scripted demos.
    pub async fn set_price(&self, asset_id: &str, price: Decimal) -> Result<()> {
        let mut catalog = self.catalog.write().await;
        let asset = catalog
            .get_mut(asset_id)
            .with_context(|| format!("Unknown asset: {}", asset_id))?;
        asset.price = price.max(self.simulator.price_floor());
        Ok(())
    }

    /// Tick forever on a fixed period. The first tick happens one period
    /// after spawning.
    pub fn spawn_ticker(&self, period: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            info!(
                "SimulatedMarketDataService: Ticking every {}ms",
                period.as_millis()
            );
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                service.tick().await;
            }
        })
    }

    pub async fn publish(&self, event: MarketEvent) {
        let mut subs = self.subscribers.write().await;
        if subs.is_empty() {
            return;
        }

        // A full buffer skips the event for that subscriber; a closed one is dropped
        subs.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("SimulatedMarketDataService: Subscriber lagging, event skipped");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
    }

    async fn publish_changes(&self, changes: &[PriceChange]) {
        let timestamp = Utc::now().timestamp_millis();
        for change in changes {
            self.publish(MarketEvent::PriceUpdate {
                asset_id: change.asset_id.clone(),
                symbol: change.symbol.clone(),
                price: change.new_price,
                timestamp,
            })
            .await;
        }
        debug!("SimulatedMarketDataService: Ticked {} assets", changes.len());
    }

    async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for SimulatedMarketDataService {
    fn default() -> Self {
        Self::new(AssetCatalog::default(), &SimulationEnvConfig::default())
    }
}

#[async_trait]
impl MarketDataService for SimulatedMarketDataService {
    async fn subscribe(&self) -> Result<Receiver<MarketEvent>> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.subscribers.write().await.push(tx);
        debug!(
            "SimulatedMarketDataService: {} subscribers",
            self.subscriber_count().await
        );
        Ok(rx)
    }

    async fn get_assets(&self) -> Result<Vec<Asset>> {
        Ok(self.catalog.read().await.assets().to_vec())
    }

    async fn get_asset(&self, key: &str) -> Result<Option<Asset>> {
        Ok(self.catalog.read().await.resolve(key).cloned())
    }

    async fn get_prices(&self) -> Result<HashMap<String, Decimal>> {
        Ok(self.catalog.read().await.prices())
    }

    async fn get_historical_series(&self, asset_id: &str, days: u32) -> Result<Vec<ChartPoint>> {
        let asset = self
            .catalog
            .read()
            .await
            .resolve(asset_id)
            .cloned()
            .with_context(|| format!("Unknown asset: {}", asset_id))?;

        let now = Utc::now().timestamp_millis();
        let mut rng = rand::rng();
        Ok(self.charts.generate(&asset, days, now, &mut rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_tick_publishes_one_update_per_asset() {
        let market = SimulatedMarketDataService::default();
        let mut rx = market.subscribe().await.unwrap();
        let mut rng = StdRng::seed_from_u64(17);

        let changes = market.tick_with(&mut rng).await;

        let mut received = 0;
        while let Ok(MarketEvent::PriceUpdate { asset_id, price, .. }) = rx.try_recv() {
            let change = changes.iter().find(|c| c.asset_id == asset_id).unwrap();
            assert_eq!(price, change.new_price);
            received += 1;
        }
        assert_eq!(received, 20);
    }

    #[tokio::test]
    async fn test_prices_follow_ticks() {
        let market = SimulatedMarketDataService::default();
        let mut rng = StdRng::seed_from_u64(2);

        let changes = market.tick_with(&mut rng).await;
        let prices = market.get_prices().await.unwrap();

        for change in changes {
            assert_eq!(prices[&change.asset_id], change.new_price);
        }
    }

    #[tokio::test]
    async fn test_closed_subscribers_are_dropped() {
        let market = SimulatedMarketDataService::default();
        let rx = market.subscribe().await.unwrap();
        let _kept = market.subscribe().await.unwrap();
        drop(rx);

        market.tick().await;

        assert_eq!(market.subscriber_count().await, 1);
    }

    #[tokio::test]
    async fn test_asset_lookup_by_symbol() {
        let market = SimulatedMarketDataService::default();

        let eth = market.get_asset("eth").await.unwrap().unwrap();
        assert_eq!(eth.id, "ethereum");
        assert!(market.get_asset("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_ends_at_live_price() {
        let market = SimulatedMarketDataService::default();
        market.set_price("cardano", dec!(0.75)).await.unwrap();

        let series = market.get_historical_series("cardano", 7).await.unwrap();

        assert_eq!(series.len(), 8);
        assert_eq!(series.last().unwrap().price, dec!(0.75));
        assert!(market.get_historical_series("nope", 7).await.is_err());
    }

    #[tokio::test]
    async fn test_spawned_ticker_publishes() {
        let market = SimulatedMarketDataService::default();
        let mut rx = market.subscribe().await.unwrap();

        let handle = market.spawn_ticker(Duration::from_millis(10));
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        handle.abort();

        assert!(matches!(event, Some(MarketEvent::PriceUpdate { .. })));
    }
}
