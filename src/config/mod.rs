//! Configuration module for cryptosim.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Account, Simulation, and Storage.

mod simulation_config;
mod storage_config;

pub use simulation_config::SimulationEnvConfig;
pub use storage_config::{StorageBackend, StorageEnvConfig};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Account
    pub starting_balance: Decimal,
    pub min_password_len: usize,

    // Views
    pub portfolio_refresh_ms: u64,

    pub simulation: SimulationEnvConfig,
    pub storage: StorageEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_balance: dec!(10000),
            min_password_len: 6,
            portfolio_refresh_ms: 3000,
            simulation: SimulationEnvConfig::default(),
            storage: StorageEnvConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Malformed money values are errors; malformed tuning knobs fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let starting_balance = match lookup("STARTING_BALANCE") {
            Some(v) => Decimal::from_str(v.trim())
                .with_context(|| format!("Invalid STARTING_BALANCE: {}", v))?,
            None => defaults.starting_balance,
        };
        if starting_balance < Decimal::ZERO {
            anyhow::bail!("STARTING_BALANCE must not be negative, got {}", starting_balance);
        }

        let min_password_len = lookup("MIN_PASSWORD_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.min_password_len);

        let portfolio_refresh_ms = lookup("PORTFOLIO_REFRESH_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.portfolio_refresh_ms);

        let storage =
            StorageEnvConfig::from_lookup(&lookup).context("Failed to load storage config")?;

        Ok(Self {
            starting_balance,
            min_password_len,
            portfolio_refresh_ms,
            simulation: SimulationEnvConfig::from_lookup(&lookup),
            storage,
        })
    }
}
