//! Trading Desk
//!
//! Entry point for views. Resolves the asset, parses the amount the user
//! typed, prices the order at the live simulated price and hands it to the
//! ledger. Every failure is turned into a message the view can show.

use crate::application::ledger::{Ledger, parse_amount};
use crate::application::session::Session;
use crate::domain::errors::TradingError;
use crate::domain::ports::MarketDataService;
use crate::domain::trading::types::{OrderSide, Trade, TradeReceipt, TradeRequest};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// What a view gets back from a trade submission
#[derive(Debug, Clone, Serialize)]
pub struct TradeOutcome {
    pub success: bool,
    pub message: String,
    /// Balance after the attempt (unchanged on failure, None when signed out)
    pub balance: Option<Decimal>,
    pub trade: Option<Trade>,
}

pub struct TradingDesk {
    ledger: Arc<Ledger>,
    market: Arc<dyn MarketDataService>,
}

impl TradingDesk {
    pub fn new(ledger: Arc<Ledger>, market: Arc<dyn MarketDataService>) -> Self {
        Self { ledger, market }
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Execute at the current market price
    pub async fn execute(
        &self,
        session: &mut Session,
        request: TradeRequest,
    ) -> Result<TradeReceipt, TradingError> {
        let amount = parse_amount(&request.amount)?;
        session.require_account()?;

        let asset = self
            .market
            .get_asset(&request.asset_id)
            .await
            .map_err(TradingError::Storage)?
            .ok_or_else(|| TradingError::UnknownAsset {
                id: request.asset_id.clone(),
            })?;

        debug!(
            "TradingDesk: {} {} {} @ ${}",
            request.side, amount, asset.symbol, asset.price
        );

        self.ledger
            .execute(session, request.side, &asset, amount, asset.price)
            .await
    }

    /// Execute and describe the result for display
    pub async fn submit(&self, session: &mut Session, request: TradeRequest) -> TradeOutcome {
        let side = request.side;
        match self.execute(session, request).await {
            Ok(receipt) => {
                let verb = match side {
                    OrderSide::Buy => "bought",
                    OrderSide::Sell => "sold",
                };
                TradeOutcome {
                    success: true,
                    message: format!(
                        "Successfully {} {} {}",
                        verb,
                        receipt.trade.amount.normalize(),
                        receipt.trade.symbol
                    ),
                    balance: Some(receipt.balance),
                    trade: Some(receipt.trade),
                }
            }
            Err(e) => {
                if !e.is_rejection() {
                    error!("TradingDesk: Trade failed: {:#}", e);
                }
                TradeOutcome {
                    success: false,
                    message: e.to_string(),
                    balance: session.balance(),
                    trade: None,
                }
            }
        }
    }
}
