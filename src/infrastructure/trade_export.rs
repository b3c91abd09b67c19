//! CSV export of the trade history.

use crate::domain::trading::types::{OrderSide, Trade};
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

const HEADER: [&str; 9] = [
    "id", "date", "side", "symbol", "asset_id", "amount", "price", "total", "timestamp",
];

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    id: &'a str,
    date: String,
    side: &'static str,
    symbol: &'a str,
    asset_id: &'a str,
    amount: Decimal,
    price: Decimal,
    total: Decimal,
    timestamp: i64,
}

impl<'a> From<&'a Trade> for TradeRow<'a> {
    fn from(trade: &'a Trade) -> Self {
        let date = Utc
            .timestamp_millis_opt(trade.timestamp)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        Self {
            id: &trade.id,
            date,
            side: match trade.side {
                OrderSide::Buy => "buy",
                OrderSide::Sell => "sell",
            },
            symbol: &trade.symbol,
            asset_id: &trade.asset_id,
            amount: trade.amount,
            price: trade.price,
            total: trade.total,
            timestamp: trade.timestamp,
        }
    }
}

/// Write trades (in the order given) as CSV. The header row is written
/// even when there are no trades.
pub fn write_trades_csv<W: Write>(writer: W, trades: &[Trade]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER).context("Failed to write CSV header")?;

    for trade in trades {
        wtr.serialize(TradeRow::from(trade))
            .with_context(|| format!("Failed to serialize trade {}", trade.id))?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

pub async fn export_trades_csv(path: &Path, trades: &[Trade]) -> Result<()> {
    let mut buffer = Vec::new();
    write_trades_csv(&mut buffer, trades)?;
    tokio::fs::write(path, buffer)
        .await
        .with_context(|| format!("Failed to write {:?}", path))?;
    info!("TradeExport: Wrote {} trades to {:?}", trades.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_csv_layout() {
        let trades = vec![
            Trade::new("bitcoin", "BTC", OrderSide::Sell, dec!(0.05), dec!(42350.45), 0).unwrap(),
            Trade::new("bitcoin", "BTC", OrderSide::Buy, dec!(0.1), dec!(42350.45), 0).unwrap(),
        ];

        let mut buffer = Vec::new();
        write_trades_csv(&mut buffer, &trades).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,date,side,symbol,asset_id,amount,price,total,timestamp"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",1970-01-01 00:00:00,sell,BTC,bitcoin,0.05,42350.45,"));
        assert!(lines[2].contains(",buy,BTC,bitcoin,0.1,42350.45,4235.045,0"));
    }

    #[test]
    fn test_empty_history_writes_header_only() {
        let mut buffer = Vec::new();
        write_trades_csv(&mut buffer, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "id,date,side,symbol,asset_id,amount,price,total,timestamp\n"
        );
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("cryptosim-test-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("trades.csv");

        export_trades_csv(&path, &[]).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec![HEADER.join(",")]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
