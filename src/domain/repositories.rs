//! Repository Pattern Abstractions
//!
//! Simulator state lives in a small key-value store holding three JSON
//! documents: the signed-in account, the holdings and the trade log.
//!
//! # Design
//!
//! - `StateStore`: raw string storage with an atomic multi-key batch write
//! - `keys`: the well-known document keys
//!
//! Typed access (and JSON encoding) happens in the application layer so that
//! a store only needs to move strings around.
//!
//! # Implementations
//!
//! - `InMemoryStateStore`: thread-safe, lost on restart; used by tests
//! - `JsonFileStore`: one JSON file on disk, replaced atomically on every batch

use anyhow::Result;
use async_trait::async_trait;

/// Well-known document keys
pub mod keys {
    pub const USER: &str = "user";
    pub const PORTFOLIO: &str = "portfolio";
    pub const TRADES: &str = "trades";
}

/// A single write in a batch: `Some` sets the key, `None` removes it
pub type StateWrite = (String, Option<String>);

/// Local key-value persistence for simulator state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a raw document
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply every write or none of them
    async fn write_batch(&self, writes: Vec<StateWrite>) -> Result<()>;

    /// Set a single key
    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.write_batch(vec![(key.to_string(), Some(value))]).await
    }

    /// Remove a single key
    async fn remove(&self, key: &str) -> Result<()> {
        self.write_batch(vec![(key.to_string(), None)]).await
    }
}
