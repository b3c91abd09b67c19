//! Storage configuration parsing from environment variables.
//!
//! This module decides where simulator state is persisted.

use anyhow::Result;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            _ => anyhow::bail!("Invalid STORAGE_BACKEND: {}. Must be 'memory' or 'file'", s),
        }
    }
}

/// Storage environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEnvConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(None),
        }
    }
}

impl StorageEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match lookup("STORAGE_BACKEND") {
            Some(v) => StorageBackend::from_str(&v)?,
            None => StorageBackend::File,
        };

        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(lookup("HOME")));

        Ok(Self { backend, data_dir })
    }
}

// ~/.cryptosim, or ./.cryptosim when HOME is unset
fn default_data_dir(home: Option<String>) -> PathBuf {
    home.or_else(|| std::env::var("HOME").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cryptosim")
}
