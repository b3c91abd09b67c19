use super::types::Trade;
use crate::domain::errors::TradingError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An account's position in one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    #[serde(rename = "cryptoId")]
    pub asset_id: String,
    pub symbol: String,
    pub amount: Decimal,
    pub average_price: Decimal,
    /// Value at the last trade; valuation recomputes it from live prices
    #[serde(default)]
    pub current_value: Decimal,
}

impl Holding {
    pub fn cost_basis(&self) -> Decimal {
        self.amount * self.average_price
    }
}

/// Ordered set of holdings, at most one per asset id.
///
/// Holdings with a non-positive amount are never kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn get(&self, asset_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.asset_id == asset_id)
    }

    /// Amount held of an asset, zero when there is no holding
    pub fn amount_of(&self, asset_id: &str) -> Decimal {
        self.get(asset_id).map(|h| h.amount).unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Add a buy fill to (or open) a holding, folding it into the weighted
    /// average cost. Fails without touching the holding if the new totals
    /// do not fit in a Decimal.
    pub fn record_buy(&mut self, fill: &Trade) -> Result<(), TradingError> {
        let overflow = || TradingError::InvalidAmount {
            input: fill.amount.to_string(),
        };

        match self.holdings.iter_mut().find(|h| h.asset_id == fill.asset_id) {
            Some(holding) => {
                let total_amount = holding.amount.checked_add(fill.amount).ok_or_else(overflow)?;
                let total_cost = holding
                    .amount
                    .checked_mul(holding.average_price)
                    .and_then(|cost| cost.checked_add(fill.total))
                    .ok_or_else(overflow)?;
                let current_value = total_amount.checked_mul(fill.price).ok_or_else(overflow)?;

                if total_amount > Decimal::ZERO {
                    holding.average_price = total_cost / total_amount;
                }
                holding.amount = total_amount;
                holding.current_value = current_value;
            }
            None => self.holdings.push(Holding {
                asset_id: fill.asset_id.clone(),
                symbol: fill.symbol.clone(),
                amount: fill.amount,
                average_price: fill.price,
                current_value: fill.total,
            }),
        }
        Ok(())
    }

    /// Take a sell fill out of a holding, dropping it once nothing is left.
    /// Average price is unchanged by a sell.
    pub fn record_sell(&mut self, fill: &Trade) -> Result<(), TradingError> {
        let idx = self
            .holdings
            .iter()
            .position(|h| h.asset_id == fill.asset_id && h.amount >= fill.amount)
            .ok_or_else(|| TradingError::InsufficientHolding {
                symbol: fill.symbol.clone(),
                requested: fill.amount,
                available: self.amount_of(&fill.asset_id),
            })?;

        let holding = &mut self.holdings[idx];
        holding.amount -= fill.amount;
        if holding.amount <= Decimal::ZERO {
            self.holdings.remove(idx);
        } else if let Some(value) = holding.amount.checked_mul(fill.price) {
            holding.current_value = value;
        }

        Ok(())
    }
}
