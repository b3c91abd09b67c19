//! Price Simulator
//!
//! Random-walks every asset price once per tick. Each step draws a uniform
//! perturbation inside a symbol-dependent band and multiplies the price by
//! `1 + perturbation`. Prices are clamped to a configurable floor so the
//! multiplicative walk can never cross zero.

use crate::config::SimulationEnvConfig;
use crate::domain::market::{Asset, AssetCatalog};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;

const PRICE_DP: u32 = 10;
const PERCENT_DP: u32 = 6;
// Fraction of each tick's percent move folded into the 24h percent figure
const PERCENT_SMOOTHING: Decimal = dec!(0.1);

#[derive(Debug, Clone)]
pub struct PriceSimulator {
    stable_symbols: Vec<String>,
    stable_volatility: f64,
    volatility: f64,
    price_floor: Decimal,
}

/// One asset's price change from a tick
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub asset_id: String,
    pub symbol: String,
    pub old_price: Decimal,
    pub new_price: Decimal,
}

impl PriceSimulator {
    pub fn new(config: &SimulationEnvConfig) -> Self {
        Self {
            stable_symbols: config.stable_symbols.clone(),
            stable_volatility: config.stable_tick_volatility,
            volatility: config.tick_volatility,
            price_floor: config.price_floor,
        }
    }

    pub fn price_floor(&self) -> Decimal {
        self.price_floor
    }

    /// Full width of the perturbation band for an asset
    pub fn band_width(&self, asset: &Asset) -> f64 {
        if asset.is_stablecoin(&self.stable_symbols) {
            self.stable_volatility
        } else {
            self.volatility
        }
    }

    /// Draw the next price for an asset without mutating it
    pub fn next_price<R: Rng + ?Sized>(&self, asset: &Asset, rng: &mut R) -> Decimal {
        let perturbation = (rng.random::<f64>() - 0.5) * self.band_width(asset);
        let factor = Decimal::from_f64(1.0 + perturbation).unwrap_or(Decimal::ONE);

        asset
            .price
            .checked_mul(factor)
            .unwrap_or(asset.price)
            .round_dp(PRICE_DP)
            .max(self.price_floor)
    }

    /// Move one asset's price and roll the move into its 24h change figures
    pub fn apply_tick<R: Rng + ?Sized>(&self, asset: &mut Asset, rng: &mut R) -> PriceChange {
        let old_price = asset.price;
        let new_price = self.next_price(asset, rng);
        let delta = new_price - old_price;

        asset.price = new_price;
        asset.change_24h += delta;
        if old_price > Decimal::ZERO {
            let percent = delta / old_price * Decimal::ONE_HUNDRED;
            asset.change_percent_24h =
                (asset.change_percent_24h + percent * PERCENT_SMOOTHING).round_dp(PERCENT_DP);
        }

        PriceChange {
            asset_id: asset.id.clone(),
            symbol: asset.symbol.clone(),
            old_price,
            new_price,
        }
    }

    /// Tick every asset in the catalog
    pub fn tick<R: Rng + ?Sized>(&self, catalog: &mut AssetCatalog, rng: &mut R) -> Vec<PriceChange> {
        catalog
            .iter_mut()
            .map(|asset| self.apply_tick(asset, rng))
            .collect()
    }
}

impl Default for PriceSimulator {
    fn default() -> Self {
        Self::new(&SimulationEnvConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ratio(change: &PriceChange) -> Decimal {
        change.new_price / change.old_price - Decimal::ONE
    }

    #[test]
    fn test_tick_stays_within_band() {
        let simulator = PriceSimulator::default();
        let mut catalog = AssetCatalog::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            for change in simulator.tick(&mut catalog, &mut rng) {
                let move_pct = ratio(&change).abs();
                if change.symbol == "USDT" || change.symbol == "USDC" {
                    assert!(move_pct <= dec!(0.000501), "{} moved {}", change.symbol, move_pct);
                } else {
                    assert!(move_pct <= dec!(0.010001), "{} moved {}", change.symbol, move_pct);
                }
            }
        }
    }

    #[test]
    fn test_tick_updates_change_fields() {
        let simulator = PriceSimulator::default();
        let mut catalog = AssetCatalog::default();
        let before = catalog.get("bitcoin").unwrap().clone();
        let mut rng = StdRng::seed_from_u64(42);

        let changes = simulator.tick(&mut catalog, &mut rng);
        let after = catalog.get("bitcoin").unwrap();
        let change = changes.iter().find(|c| c.asset_id == "bitcoin").unwrap();

        assert_eq!(changes.len(), catalog.len());
        assert_eq!(after.price, change.new_price);
        assert_eq!(
            after.change_24h,
            before.change_24h + (change.new_price - change.old_price)
        );
    }

    #[test]
    fn test_price_floor_clamps_random_walk() {
        let config = SimulationEnvConfig {
            // Band of ±110% lets a single draw push the price negative
            tick_volatility: 2.2,
            price_floor: dec!(0.5),
            ..SimulationEnvConfig::default()
        };
        let simulator = PriceSimulator::new(&config);
        let mut catalog = AssetCatalog::default();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..100 {
            simulator.tick(&mut catalog, &mut rng);
            assert!(catalog.iter().all(|a| a.price >= dec!(0.5)));
        }
    }

    #[test]
    fn test_band_width_by_symbol() {
        let simulator = PriceSimulator::default();
        let catalog = AssetCatalog::default();

        assert_eq!(simulator.band_width(catalog.get("tether").unwrap()), 0.001);
        assert_eq!(simulator.band_width(catalog.get("bitcoin").unwrap()), 0.02);
    }
}
