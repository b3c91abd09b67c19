use rust_decimal::Decimal;
use thiserror::Error;

/// Errors related to trade requests and ledger commits
#[derive(Debug, Error)]
pub enum TradingError {
    #[error("Please enter a valid amount")]
    InvalidAmount { input: String },

    #[error("Invalid execution price: {price}")]
    InvalidPrice { price: Decimal },

    #[error("Insufficient balance")]
    InsufficientFunds { need: Decimal, available: Decimal },

    #[error("Insufficient {symbol} balance")]
    InsufficientHolding {
        symbol: String,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Unknown asset: {id}")]
    UnknownAsset { id: String },

    #[error("Please sign in to trade")]
    NotSignedIn,

    #[error("Failed to persist trade: {0:#}")]
    Storage(#[source] anyhow::Error),
}

impl TradingError {
    /// Rejections caused by the request itself, as opposed to storage faults
    pub fn is_rejection(&self) -> bool {
        !matches!(self, TradingError::Storage(_))
    }
}

/// Errors related to sign-in and registration
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    #[error("Failed to persist session: {0:#}")]
    Storage(#[source] anyhow::Error),
}
