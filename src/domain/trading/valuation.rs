use super::portfolio::{Holding, Portfolio};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// Live valuation of a single holding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValuation {
    pub holding: Holding,
    pub current_price: Decimal,
    pub current_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
    /// False when no live price was available and the average price was used
    pub priced: bool,
}

impl HoldingValuation {
    pub fn new(holding: &Holding, current_price: Option<Decimal>) -> Self {
        let priced = current_price.is_some();
        let current_price = current_price.unwrap_or(holding.average_price);
        let cost_basis = holding.cost_basis();
        let current_value = holding.amount * current_price;
        let profit_loss = current_value - cost_basis;

        let profit_loss_percent = if cost_basis.is_zero() {
            Decimal::ZERO
        } else {
            profit_loss / cost_basis * Decimal::ONE_HUNDRED
        };

        let mut holding = holding.clone();
        holding.current_value = current_value;

        Self {
            holding,
            current_price,
            current_value,
            profit_loss,
            profit_loss_percent,
            priced,
        }
    }
}

/// Portfolio-wide valuation snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<HoldingValuation>,
    pub total_value: Decimal,
    pub total_cost: Decimal,
    pub total_profit_loss: Decimal,
}

impl PortfolioValuation {
    /// Value every holding at the given prices (keyed by asset id)
    pub fn calculate(portfolio: &Portfolio, prices: &HashMap<String, Decimal>) -> Self {
        let holdings: Vec<HoldingValuation> = portfolio
            .holdings()
            .iter()
            .map(|h| HoldingValuation::new(h, prices.get(&h.asset_id).copied()))
            .collect();

        let total_value = holdings.iter().map(|v| v.current_value).sum();
        let total_cost = holdings.iter().map(|v| v.holding.cost_basis()).sum();

        Self {
            holdings,
            total_value,
            total_cost,
            total_profit_loss: total_value - total_cost,
        }
    }

    /// Cash plus marked-to-market holdings
    pub fn equity(&self, cash: Decimal) -> Decimal {
        cash + self.total_value
    }

    pub fn total_profit_loss_percent(&self) -> Decimal {
        if self.total_cost.is_zero() {
            Decimal::ZERO
        } else {
            self.total_profit_loss / self.total_cost * Decimal::ONE_HUNDRED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trading::types::{OrderSide, Trade};
    use rust_decimal_macros::dec;

    fn portfolio_with(entries: &[(&str, Decimal, Decimal)]) -> Portfolio {
        let mut portfolio = Portfolio::new();
        for (id, amount, price) in entries {
            let fill = Trade::new(id, &id.to_uppercase(), OrderSide::Buy, *amount, *price, 0).unwrap();
            portfolio.record_buy(&fill).unwrap();
        }
        portfolio
    }

    #[test]
    fn test_profit_valuation() {
        let portfolio = portfolio_with(&[("bitcoin", dec!(2), dec!(100))]);
        let prices = HashMap::from([("bitcoin".to_string(), dec!(110))]);

        let valuation = PortfolioValuation::calculate(&portfolio, &prices);
        let v = &valuation.holdings[0];

        // 2 * 110 = 220 value, 200 cost
        assert_eq!(v.current_value, dec!(220));
        assert_eq!(v.profit_loss, dec!(20));
        assert_eq!(v.profit_loss_percent, dec!(10));
        assert!(v.priced);
        assert_eq!(valuation.total_value, dec!(220));
    }

    #[test]
    fn test_loss_valuation_and_totals() {
        let portfolio = portfolio_with(&[
            ("ethereum", dec!(5), dec!(200)),
            ("solana", dec!(10), dec!(10)),
        ]);
        let prices = HashMap::from([
            ("ethereum".to_string(), dec!(180)),
            ("solana".to_string(), dec!(12)),
        ]);

        let valuation = PortfolioValuation::calculate(&portfolio, &prices);

        // ETH: 900 vs 1000 -> -100 (-10%); SOL: 120 vs 100 -> +20
        assert_eq!(valuation.holdings[0].profit_loss, dec!(-100));
        assert_eq!(valuation.holdings[0].profit_loss_percent, dec!(-10));
        assert_eq!(valuation.total_value, dec!(1020));
        assert_eq!(valuation.total_cost, dec!(1100));
        assert_eq!(valuation.total_profit_loss, dec!(-80));
        assert_eq!(valuation.equity(dec!(500)), dec!(1520));
    }

    #[test]
    fn test_zero_cost_basis_yields_zero_percent() {
        let portfolio = portfolio_with(&[("airdrop", dec!(3), Decimal::ZERO)]);
        let prices = HashMap::from([("airdrop".to_string(), dec!(5))]);

        let valuation = PortfolioValuation::calculate(&portfolio, &prices);

        assert_eq!(valuation.holdings[0].profit_loss, dec!(15));
        assert_eq!(valuation.holdings[0].profit_loss_percent, Decimal::ZERO);
        assert_eq!(valuation.total_profit_loss_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_missing_price_falls_back_to_average() {
        let portfolio = portfolio_with(&[("delisted", dec!(4), dec!(25))]);

        let valuation = PortfolioValuation::calculate(&portfolio, &HashMap::new());
        let v = &valuation.holdings[0];

        assert!(!v.priced);
        assert_eq!(v.current_value, dec!(100));
        assert_eq!(v.profit_loss, Decimal::ZERO);
    }

    #[test]
    fn test_empty_portfolio() {
        let valuation = PortfolioValuation::calculate(&Portfolio::new(), &HashMap::new());
        assert_eq!(valuation.total_value, Decimal::ZERO);
        assert!(valuation.holdings.is_empty());
    }
}
