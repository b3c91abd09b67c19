//! Plain-text views of market, portfolio and history state.

use super::format::{format_amount, format_market_cap, format_percent, format_price};
use crate::domain::account::Account;
use crate::domain::market::{Asset, ChartPoint, Timeframe};
use crate::domain::trading::types::Trade;
use crate::domain::trading::valuation::PortfolioValuation;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::fmt::Write;

fn date(timestamp_ms: i64, pattern: &str) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn signed_price(value: Decimal) -> String {
    if value.is_sign_negative() {
        format_price(value)
    } else {
        format!("+{}", format_price(value))
    }
}

pub fn render_catalog(assets: &[Asset]) -> String {
    let mut out = format!(
        "{:>3}  {:<20} {:<6} {:>16} {:>9} {:>12}\n",
        "#", "Name", "Symbol", "Price", "24h", "Market Cap"
    );
    for asset in assets {
        let _ = writeln!(
            out,
            "{:>3}  {} {:<18} {:<6} {:>16} {:>9} {:>12}",
            asset.rank,
            asset.icon,
            asset.name,
            asset.symbol,
            format_price(asset.price),
            format_percent(asset.change_percent_24h),
            format_market_cap(asset.market_cap),
        );
    }
    out
}

pub fn render_chart(asset: &Asset, timeframe: Timeframe, series: &[ChartPoint]) -> String {
    let mut out = format!("{} ({}) - {}\n", asset.name, asset.symbol, timeframe.label());

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let high = series.iter().map(|p| p.price).max().unwrap_or(last.price);
        let low = series.iter().map(|p| p.price).min().unwrap_or(last.price);
        let change = if first.price.is_zero() {
            Decimal::ZERO
        } else {
            (last.price - first.price) / first.price * Decimal::ONE_HUNDRED
        };
        let _ = writeln!(
            out,
            "High {}  Low {}  Change {}",
            format_price(high),
            format_price(low),
            format_percent(change)
        );
    }

    for point in series {
        let _ = writeln!(
            out,
            "{}  {:>16}  vol {:>10}",
            date(point.timestamp, "%Y-%m-%d"),
            format_price(point.price),
            format_market_cap(point.volume)
        );
    }
    out
}

pub fn render_account(account: &Account) -> String {
    format!(
        "{} <{}> (id {})\nBalance: {}",
        account.name,
        account.email,
        account.id,
        format_price(account.balance)
    )
}

pub fn render_portfolio(valuation: &PortfolioValuation, cash: Decimal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Cash:           {}", format_price(cash));
    let _ = writeln!(out, "Holdings value: {}", format_price(valuation.total_value));
    let _ = writeln!(out, "Total equity:   {}", format_price(valuation.equity(cash)));

    if valuation.holdings.is_empty() {
        out.push_str("\nNo holdings yet\nStart trading cryptocurrencies to build your portfolio\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Total P/L:      {} ({})\n",
        signed_price(valuation.total_profit_loss),
        format_percent(valuation.total_profit_loss_percent())
    );
    let _ = writeln!(
        out,
        "{:<6} {:>16} {:>14} {:>14} {:>16} {:>16} {:>9}",
        "Symbol", "Amount", "Avg", "Price", "Value", "P/L", "P/L %"
    );
    for v in &valuation.holdings {
        let _ = writeln!(
            out,
            "{:<6} {:>16} {:>14} {:>14} {:>16} {:>16} {:>9}{}",
            v.holding.symbol,
            format_amount(v.holding.amount),
            format_price(v.holding.average_price),
            format_price(v.current_price),
            format_price(v.current_value),
            signed_price(v.profit_loss),
            format_percent(v.profit_loss_percent),
            if v.priced { "" } else { "  (no live price)" }
        );
    }
    out
}

pub fn render_history(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "No trades yet\n".to_string();
    }

    let mut out = String::new();
    for trade in trades {
        let _ = writeln!(
            out,
            "{}  {:<4} {:>16} {:<6} @ {:>14}  {:>16}",
            date(trade.timestamp, "%Y-%m-%d %H:%M:%S"),
            trade.side,
            format_amount(trade.amount),
            trade.symbol,
            format_price(trade.price),
            format_price(trade.total)
        );
    }
    out
}
