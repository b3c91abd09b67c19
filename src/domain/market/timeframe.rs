use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chart ranges offered for an asset's synthetic price history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    OneDay,
    OneWeek,
    #[default]
    OneMonth,
    ThreeMonths,
}

impl Timeframe {
    /// Number of daily steps generated for this range
    pub fn to_days(&self) -> u32 {
        match self {
            Timeframe::OneDay => 1,
            Timeframe::OneWeek => 7,
            Timeframe::OneMonth => 30,
            Timeframe::ThreeMonths => 90,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "24h",
            Timeframe::OneWeek => "7d",
            Timeframe::OneMonth => "30d",
            Timeframe::ThreeMonths => "90d",
        }
    }

    /// Returns all available timeframes in ascending order
    pub fn all() -> Vec<Timeframe> {
        vec![
            Timeframe::OneDay,
            Timeframe::OneWeek,
            Timeframe::OneMonth,
            Timeframe::ThreeMonths,
        ]
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "24h" | "1d" => Ok(Timeframe::OneDay),
            "7d" | "1w" => Ok(Timeframe::OneWeek),
            "30d" | "1mo" => Ok(Timeframe::OneMonth),
            "90d" | "3mo" => Ok(Timeframe::ThreeMonths),
            _ => Err(anyhow!(
                "Invalid timeframe: '{}'. Valid options: 24h, 7d, 30d, 90d",
                s
            )),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
