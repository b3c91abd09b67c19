use crate::config::SimulationEnvConfig;
use crate::domain::market::{Asset, ChartPoint};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const SERIES_DP: u32 = 8;
// History starts 10% below the live price
const SEED_DISCOUNT: Decimal = dec!(0.9);

/// Synthetic daily price history for charting.
///
/// The series always ends exactly at the asset's live price; everything
/// before that is a random walk and is not reproducible between calls.
#[derive(Debug, Clone)]
pub struct ChartGenerator {
    anchor_symbol: String,
    anchor_volatility: f64,
    volatility: f64,
}

impl ChartGenerator {
    pub fn new(config: &SimulationEnvConfig) -> Self {
        Self {
            anchor_symbol: config.chart_anchor_symbol.clone(),
            anchor_volatility: config.chart_anchor_volatility,
            volatility: config.chart_volatility,
        }
    }

    /// Day-over-day band width for an asset
    pub fn volatility_for(&self, asset: &Asset) -> f64 {
        if asset.symbol.eq_ignore_ascii_case(&self.anchor_symbol) {
            self.anchor_volatility
        } else {
            self.volatility
        }
    }

    /// `days + 1` points, one day apart, the last stamped `now_ms`
    pub fn generate<R: Rng + ?Sized>(
        &self,
        asset: &Asset,
        days: u32,
        now_ms: i64,
        rng: &mut R,
    ) -> Vec<ChartPoint> {
        let volatility = self.volatility_for(asset);
        let volume_24h = asset.volume_24h.to_f64().unwrap_or(0.0);
        let mut price = (asset.price * SEED_DISCOUNT).to_f64().unwrap_or(0.0);

        (0..=days)
            .rev()
            .map(|days_back| {
                let change = (rng.random::<f64>() - 0.5) * volatility;
                price *= 1.0 + change;

                let point_price = if days_back == 0 {
                    asset.price
                } else {
                    Decimal::from_f64(price)
                        .unwrap_or(Decimal::ZERO)
                        .round_dp(SERIES_DP)
                };

                let volume = volume_24h * (0.5 + rng.random::<f64>() * 0.5);

                ChartPoint {
                    timestamp: now_ms - i64::from(days_back) * MS_PER_DAY,
                    price: point_price,
                    volume: Decimal::from_f64(volume)
                        .unwrap_or(Decimal::ZERO)
                        .round_dp(2),
                }
            })
            .collect()
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new(&SimulationEnvConfig::default())
    }
}
