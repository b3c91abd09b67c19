//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementation of the `StateStore` trait defined
//! in `domain::repositories`.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock>` for concurrent access
//! - **Atomic batches**: a whole batch is applied under one write lock
//! - **Testing**: Ideal for unit tests and throwaway sessions
//!
//! # Limitations
//!
//! - Data is lost on application restart

use crate::domain::repositories::{StateStore, StateWrite};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of StateStore
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing documents
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Copy of every stored document
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write_batch(&self, writes: Vec<StateWrite>) -> Result<()> {
        let mut entries = self.entries.write().await;
        for (key, value) in writes {
            match value {
                Some(value) => {
                    entries.insert(key, value);
                }
                None => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
