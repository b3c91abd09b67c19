//! Portfolio Valuation Service
//!
//! Marks the persisted holdings to the live simulated prices.

use crate::application::ledger::Ledger;
use crate::domain::ports::MarketDataService;
use crate::domain::trading::valuation::PortfolioValuation;
use anyhow::Result;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

/// Portfolio Valuation Service
///
/// # Responsibilities
///
/// - Read the holdings the ledger has persisted
/// - Fetch current prices from the market data service
/// - Produce per-holding P/L and portfolio totals
pub struct PortfolioValuationService {
    market_service: Arc<dyn MarketDataService>,
    ledger: Arc<Ledger>,
}

impl PortfolioValuationService {
    pub fn new(market_service: Arc<dyn MarketDataService>, ledger: Arc<Ledger>) -> Self {
        Self {
            market_service,
            ledger,
        }
    }

    /// Value every holding at the latest prices
    pub async fn valuate(&self) -> Result<PortfolioValuation> {
        let portfolio = self.ledger.portfolio().await?;
        if portfolio.is_empty() {
            return Ok(PortfolioValuation::default());
        }

        let prices = match self.market_service.get_prices().await {
            Ok(prices) => prices,
            Err(e) => {
                warn!("PortfolioValuationService: Failed to fetch prices: {}", e);
                return Err(e);
            }
        };

        let valuation = PortfolioValuation::calculate(&portfolio, &prices);
        debug!(
            "PortfolioValuationService: {} holdings worth ${} (P/L ${})",
            valuation.holdings.len(),
            valuation.total_value,
            valuation.total_profit_loss
        );
        Ok(valuation)
    }

    /// Valuation plus total equity (cash + holdings)
    pub async fn equity(&self, cash: Decimal) -> Result<(PortfolioValuation, Decimal)> {
        let valuation = self.valuate().await?;
        let equity = valuation.equity(cash);
        Ok((valuation, equity))
    }
}
