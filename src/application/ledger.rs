//! Ledger
//!
//! The simulated trading engine. A buy or sell is validated against the
//! session's balance and the persisted holdings, then committed as a single
//! batch covering the account, the holdings and the trade log. Nothing is
//! written (and the session is not touched) unless the whole batch lands.

use crate::application::session::Session;
use crate::domain::account::Account;
use crate::domain::errors::TradingError;
use crate::domain::market::Asset;
use crate::domain::repositories::{StateStore, keys};
use crate::domain::trading::portfolio::Portfolio;
use crate::domain::trading::types::{OrderSide, Trade, TradeReceipt};
use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Parse a user-entered amount. Anything that is not a positive number is
/// rejected.
pub fn parse_amount(input: &str) -> Result<Decimal, TradingError> {
    let trimmed = input.trim();
    let invalid = || TradingError::InvalidAmount {
        input: input.to_string(),
    };

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;

    if amount <= Decimal::ZERO {
        return Err(invalid());
    }
    Ok(amount)
}

pub struct Ledger {
    store: Arc<dyn StateStore>,
    // Serialises read-modify-write cycles against the store
    commit_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            commit_lock: Mutex::new(()),
        }
    }

    /// Persisted holdings (empty when nothing has been traded)
    pub async fn portfolio(&self) -> Result<Portfolio> {
        match self.store.get(keys::PORTFOLIO).await? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to parse portfolio JSON"),
            None => Ok(Portfolio::new()),
        }
    }

    /// Persisted trade log, newest first
    pub async fn trades(&self) -> Result<Vec<Trade>> {
        match self.store.get(keys::TRADES).await? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to parse trades JSON"),
            None => Ok(Vec::new()),
        }
    }

    /// Net amount bought minus sold for an asset, according to the trade log
    pub async fn net_traded(&self, asset_id: &str) -> Result<Decimal> {
        Ok(self
            .trades()
            .await?
            .iter()
            .filter(|t| t.asset_id == asset_id)
            .map(Trade::signed_amount)
            .sum())
    }

    pub async fn buy(
        &self,
        session: &mut Session,
        asset: &Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, TradingError> {
        self.execute(session, OrderSide::Buy, asset, amount, price)
            .await
    }

    pub async fn sell(
        &self,
        session: &mut Session,
        asset: &Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, TradingError> {
        self.execute(session, OrderSide::Sell, asset, amount, price)
            .await
    }

    pub async fn execute(
        &self,
        session: &mut Session,
        side: OrderSide,
        asset: &Asset,
        amount: Decimal,
        price: Decimal,
    ) -> Result<TradeReceipt, TradingError> {
        if amount <= Decimal::ZERO {
            return Err(TradingError::InvalidAmount {
                input: amount.to_string(),
            });
        }
        if price <= Decimal::ZERO {
            return Err(TradingError::InvalidPrice { price });
        }
        let mut account = session.require_account()?.clone();

        let trade = match Trade::new(
            &asset.id,
            &asset.symbol,
            side,
            amount,
            price,
            Utc::now().timestamp_millis(),
        ) {
            Some(trade) => trade,
            None => return Err(self.reject_overflow(side, asset, amount, &account).await),
        };
        // Dust whose total rounds to nothing would trade for free
        if trade.total.is_zero() {
            warn!(
                "Ledger: Rejected {} {} {} - total rounds to zero",
                side, amount, asset.symbol
            );
            return Err(TradingError::InvalidAmount {
                input: amount.to_string(),
            });
        }

        let _guard = self.commit_lock.lock().await;

        let mut portfolio = self.portfolio().await.map_err(TradingError::Storage)?;
        let mut trades = self.trades().await.map_err(TradingError::Storage)?;

        match side {
            OrderSide::Buy => {
                if account.balance < trade.total {
                    warn!(
                        "Ledger: Rejected BUY {} {} - need ${}, available ${}",
                        amount, asset.symbol, trade.total, account.balance
                    );
                    return Err(TradingError::InsufficientFunds {
                        need: trade.total,
                        available: account.balance,
                    });
                }
                portfolio.record_buy(&trade)?;
                account.balance -= trade.total;
            }
            OrderSide::Sell => {
                if let Err(e) = portfolio.record_sell(&trade) {
                    warn!(
                        "Ledger: Rejected SELL {} {} - holding {}",
                        amount,
                        asset.symbol,
                        portfolio.amount_of(&asset.id)
                    );
                    return Err(e);
                }
                account.balance = account.balance.checked_add(trade.total).ok_or_else(|| {
                    TradingError::InvalidAmount {
                        input: amount.to_string(),
                    }
                })?;
            }
        }

        trades.insert(0, trade.clone());

        let writes = encode_batch(&account, &portfolio, &trades).map_err(TradingError::Storage)?;
        self.store
            .write_batch(writes)
            .await
            .map_err(TradingError::Storage)?;

        let balance = account.balance;
        session.replace_account(account);

        info!(
            "Ledger: {} {} {} @ ${} (total ${}, balance ${})",
            side, amount, asset.symbol, price, trade.total, balance
        );

        Ok(TradeReceipt { trade, balance })
    }

    /// A trade whose total does not fit in a Decimal can never be covered:
    /// a buy exceeds any balance and a sell exceeds any holding.
    async fn reject_overflow(
        &self,
        side: OrderSide,
        asset: &Asset,
        amount: Decimal,
        account: &Account,
    ) -> TradingError {
        warn!(
            "Ledger: Rejected {} {} {} - total out of range",
            side, amount, asset.symbol
        );
        match side {
            OrderSide::Buy => TradingError::InsufficientFunds {
                need: Decimal::MAX,
                available: account.balance,
            },
            OrderSide::Sell => match self.portfolio().await {
                Ok(portfolio) => TradingError::InsufficientHolding {
                    symbol: asset.symbol.clone(),
                    requested: amount,
                    available: portfolio.amount_of(&asset.id),
                },
                Err(e) => TradingError::Storage(e),
            },
        }
    }
}

fn encode_batch(
    account: &Account,
    portfolio: &Portfolio,
    trades: &[Trade],
) -> Result<Vec<(String, Option<String>)>> {
    Ok(vec![
        (
            keys::USER.to_string(),
            Some(serde_json::to_string(account).context("Failed to serialize user")?),
        ),
        (
            keys::PORTFOLIO.to_string(),
            Some(serde_json::to_string(portfolio).context("Failed to serialize portfolio")?),
        ),
        (
            keys::TRADES.to_string(),
            Some(serde_json::to_string(trades).context("Failed to serialize trades")?),
        ),
    ])
}
