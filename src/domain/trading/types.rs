use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.pad("BUY"),
            OrderSide::Sell => f.pad("SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(OrderSide::Buy),
            "sell" => Ok(OrderSide::Sell),
            _ => anyhow::bail!("Invalid side: {}. Must be 'buy' or 'sell'", s),
        }
    }
}

/// An executed buy or sell. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: String,
    #[serde(rename = "cryptoId")]
    pub asset_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub side: OrderSide,
    pub amount: Decimal,
    pub price: Decimal,
    pub total: Decimal, // amount * price
    pub timestamp: i64, // ms since epoch
}

impl Trade {
    pub fn new(
        asset_id: &str,
        symbol: &str,
        side: OrderSide,
        amount: Decimal,
        price: Decimal,
        timestamp: i64,
    ) -> Option<Self> {
        // None when amount * price does not fit in a Decimal
        let total = amount.checked_mul(price)?;

        Some(Self {
            id: uuid::Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            symbol: symbol.to_string(),
            side,
            amount,
            price,
            total,
            timestamp,
        })
    }

    /// Signed amount: positive for buys, negative for sells
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            OrderSide::Buy => self.amount,
            OrderSide::Sell => -self.amount,
        }
    }
}

/// A trade request as it arrives from a view: raw amount text, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub asset_id: String,
    pub side: OrderSide,
    pub amount: String,
}

impl TradeRequest {
    pub fn buy(asset_id: &str, amount: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            side: OrderSide::Buy,
            amount: amount.to_string(),
        }
    }

    pub fn sell(asset_id: &str, amount: &str) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            side: OrderSide::Sell,
            amount: amount.to_string(),
        }
    }
}

/// Result of a committed ledger operation
#[derive(Debug, Clone, PartialEq)]
pub struct TradeReceipt {
    pub trade: Trade,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_total() {
        let trade = Trade::new("bitcoin", "BTC", OrderSide::Buy, dec!(0.1), dec!(42350.45), 0).unwrap();
        assert_eq!(trade.total, dec!(4235.045));
        assert_eq!(trade.signed_amount(), dec!(0.1));
    }

    #[test]
    fn test_trade_total_overflow() {
        let huge = dec!(99999999999999999999999999);
        assert!(Trade::new("bitcoin", "BTC", OrderSide::Buy, huge, dec!(42350.45), 0).is_none());
    }

    #[test]
    fn test_trade_json_layout() {
        let trade = Trade::new("bitcoin", "BTC", OrderSide::Sell, dec!(2), dec!(10), 1000).unwrap();
        let json = serde_json::to_value(&trade).unwrap();

        assert_eq!(json["cryptoId"], "bitcoin");
        assert_eq!(json["type"], "sell");
        assert_eq!(json["timestamp"], 1000);
        assert_eq!(trade.signed_amount(), dec!(-2));
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!(OrderSide::from_str("BUY").unwrap(), OrderSide::Buy);
        assert_eq!(OrderSide::from_str("sell").unwrap(), OrderSide::Sell);
        assert!(OrderSide::from_str("hold").is_err());
    }
}
