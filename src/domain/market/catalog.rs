//! Asset Catalog
//!
//! The fixed list of simulated assets the simulator trades. The built-in
//! table mirrors the top 20 coins by market cap at the time the simulator
//! was written; a TOML file can replace it.

use super::asset::Asset;
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    /// Build a catalog, rejecting duplicate ids, duplicate or zero ranks and
    /// non-positive prices. Assets are kept ordered by rank.
    pub fn new(mut assets: Vec<Asset>) -> Result<Self> {
        let mut ids = HashSet::new();
        let mut ranks = HashSet::new();

        for asset in &assets {
            if asset.id.trim().is_empty() {
                bail!("Asset id must not be empty (symbol {})", asset.symbol);
            }
            if !ids.insert(asset.id.clone()) {
                bail!("Duplicate asset id: {}", asset.id);
            }
            if asset.rank == 0 {
                bail!("Asset {} must have a positive rank", asset.id);
            }
            if !ranks.insert(asset.rank) {
                bail!("Duplicate rank {} for asset {}", asset.rank, asset.id);
            }
            if asset.price <= Decimal::ZERO {
                bail!("Asset {} must have a positive price, got {}", asset.id, asset.price);
            }
        }

        assets.sort_by_key(|a| a.rank);
        Ok(Self { assets })
    }

    /// Parse a catalog from TOML (`[[assets]]` tables).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Failed to parse catalog TOML")?;
        Self::new(file.assets)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid catalog file {:?}", path))
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    /// Look up by id, falling back to a case-insensitive symbol match.
    /// Ids win, so "bnb" resolves to the asset whose id is "bnb".
    pub fn resolve(&self, key: &str) -> Option<&Asset> {
        self.get(key).or_else(|| {
            self.assets
                .iter()
                .find(|a| a.symbol.eq_ignore_ascii_case(key))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Asset> {
        self.assets.iter_mut()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Current price per asset id
    pub fn prices(&self) -> HashMap<String, Decimal> {
        self.assets
            .iter()
            .map(|a| (a.id.clone(), a.price))
            .collect()
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self {
            assets: default_assets(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn asset(
    id: &str,
    name: &str,
    symbol: &str,
    price: Decimal,
    change_24h: Decimal,
    change_percent_24h: Decimal,
    market_cap: Decimal,
    volume_24h: Decimal,
    rank: u32,
    icon: &str,
) -> Asset {
    Asset {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        price,
        change_24h,
        change_percent_24h,
        market_cap,
        volume_24h,
        rank,
        icon: icon.to_string(),
    }
}

fn default_assets() -> Vec<Asset> {
    vec![
        asset("bitcoin", "Bitcoin", "BTC", dec!(42350.45), dec!(1250.30), dec!(3.04), dec!(828000000000), dec!(15600000000), 1, "₿"),
        asset("ethereum", "Ethereum", "ETH", dec!(2580.67), dec!(-45.20), dec!(-1.72), dec!(310000000000), dec!(8900000000), 2, "Ξ"),
        asset("tether", "Tether", "USDT", dec!(1.00), dec!(0.001), dec!(0.1), dec!(95000000000), dec!(23000000000), 3, "₮"),
        asset("bnb", "BNB", "BNB", dec!(315.42), dec!(8.75), dec!(2.85), dec!(47000000000), dec!(1200000000), 4, "B"),
        asset("solana", "Solana", "SOL", dec!(98.23), dec!(5.67), dec!(6.13), dec!(42000000000), dec!(2400000000), 5, "◎"),
        asset("xrp", "XRP", "XRP", dec!(0.625), dec!(0.034), dec!(5.75), dec!(34000000000), dec!(1800000000), 6, "X"),
        asset("usdc", "USD Coin", "USDC", dec!(1.000), dec!(0.0001), dec!(0.01), dec!(32000000000), dec!(5600000000), 7, "$"),
        asset("cardano", "Cardano", "ADA", dec!(0.485), dec!(0.023), dec!(4.98), dec!(17000000000), dec!(890000000), 8, "₳"),
        asset("avalanche", "Avalanche", "AVAX", dec!(36.84), dec!(-1.42), dec!(-3.71), dec!(14500000000), dec!(650000000), 9, "A"),
        asset("dogecoin", "Dogecoin", "DOGE", dec!(0.082), dec!(0.004), dec!(5.12), dec!(11800000000), dec!(420000000), 10, "D"),
        asset("chainlink", "Chainlink", "LINK", dec!(14.67), dec!(0.85), dec!(6.15), dec!(8600000000), dec!(340000000), 11, "⬢"),
        asset("polygon", "Polygon", "MATIC", dec!(0.89), dec!(0.045), dec!(5.33), dec!(8200000000), dec!(380000000), 12, "M"),
        asset("litecoin", "Litecoin", "LTC", dec!(72.34), dec!(-2.15), dec!(-2.89), dec!(5400000000), dec!(290000000), 13, "Ł"),
        asset("polkadot", "Polkadot", "DOT", dec!(6.78), dec!(0.34), dec!(5.27), dec!(5100000000), dec!(185000000), 14, "●"),
        asset("tron", "TRON", "TRX", dec!(0.105), dec!(0.008), dec!(8.25), dec!(9200000000), dec!(950000000), 15, "T"),
        asset("wrapped-bitcoin", "Wrapped Bitcoin", "WBTC", dec!(42335.67), dec!(1245.20), dec!(3.03), dec!(6700000000), dec!(145000000), 16, "₿"),
        asset("uniswap", "Uniswap", "UNI", dec!(6.45), dec!(0.23), dec!(3.70), dec!(4900000000), dec!(98000000), 17, "🦄"),
        asset("cosmos", "Cosmos", "ATOM", dec!(10.56), dec!(0.67), dec!(6.78), dec!(4100000000), dec!(125000000), 18, "⚛"),
        asset("stellar", "Stellar", "XLM", dec!(0.125), dec!(0.009), dec!(7.75), dec!(3600000000), dec!(87000000), 19, "✦"),
        asset("ethereum-classic", "Ethereum Classic", "ETC", dec!(20.45), dec!(-0.95), dec!(-4.44), dec!(3100000000), dec!(165000000), 20, "Ξ"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = AssetCatalog::default();
        assert_eq!(catalog.len(), 20);

        // Round-trip through the validating constructor
        let validated = AssetCatalog::new(catalog.assets().to_vec()).unwrap();
        assert_eq!(validated, catalog);

        let ranks: Vec<u32> = catalog.iter().map(|a| a.rank).collect();
        assert_eq!(ranks, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_resolve_by_id_and_symbol() {
        let catalog = AssetCatalog::default();

        assert_eq!(catalog.resolve("bitcoin").unwrap().symbol, "BTC");
        assert_eq!(catalog.resolve("eth").unwrap().id, "ethereum");
        assert_eq!(catalog.resolve("USDC").unwrap().id, "usdc");
        assert!(catalog.resolve("nope").is_none());
    }

    #[test]
    fn test_rejects_duplicate_rank() {
        let mut assets = AssetCatalog::default().assets().to_vec();
        assets[1].rank = 1;

        let err = AssetCatalog::new(assets).unwrap_err();
        assert!(err.to_string().contains("Duplicate rank"));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut assets = AssetCatalog::default().assets().to_vec();
        assets[0].price = Decimal::ZERO;

        assert!(AssetCatalog::new(assets).is_err());
    }

    #[test]
    fn test_from_toml() {
        let content = r#"
            [[assets]]
            id = "beta"
            name = "Beta Coin"
            symbol = "BETA"
            price = "2.5"
            rank = 2

            [[assets]]
            id = "alpha"
            name = "Alpha Coin"
            symbol = "ALP"
            price = "100"
            volume24h = "5000"
            rank = 1
        "#;

        let catalog = AssetCatalog::from_toml_str(content).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.assets()[0].id, "alpha");
        assert_eq!(catalog.get("alpha").unwrap().volume_24h, dec!(5000));
        assert_eq!(catalog.get("beta").unwrap().change_24h, Decimal::ZERO);
    }
}
