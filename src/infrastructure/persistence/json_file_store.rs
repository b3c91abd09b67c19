use crate::domain::repositories::{StateStore, StateWrite};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// All documents in one JSON object, rewritten as a whole on every batch.
///
/// The file is replaced with a temp-file-then-rename, so a reader never sees
/// a batch half applied. The in-memory copy is only updated after the rename
/// succeeds.
pub struct JsonFileStore {
    file_path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create) `state.json` inside `data_dir`
    pub async fn open(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir)
                .await
                .context("Failed to create data directory")?;
        }
        Self::open_file(data_dir.join("state.json")).await
    }

    pub async fn open_file(file_path: PathBuf) -> Result<Self> {
        let entries = if fs::try_exists(&file_path).await.unwrap_or(false) {
            let content = fs::read_to_string(&file_path)
                .await
                .context("Failed to read state file")?;
            let entries: BTreeMap<String, String> =
                serde_json::from_str(&content).context("Failed to parse state file JSON")?;
            info!("JsonFileStore: Loaded {} documents from {:?}", entries.len(), file_path);
            entries
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            file_path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize state")?;

        // Atomic write: write to temp file then rename
        let temp_path = self.file_path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .context("Failed to write temp state file")?;
        fs::rename(&temp_path, &self.file_path)
            .await
            .context("Failed to rename state file")?;

        debug!("JsonFileStore: Saved state to {:?}", self.file_path);
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write_batch(&self, writes: Vec<StateWrite>) -> Result<()> {
        let mut entries = self.entries.write().await;

        let mut staged = entries.clone();
        for (key, value) in writes {
            match value {
                Some(value) => {
                    staged.insert(key, value);
                }
                None => {
                    staged.remove(&key);
                }
            }
        }

        self.persist(&staged).await?;
        *entries = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("cryptosim-test-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_batch_survives_reopen() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();

        store
            .write_batch(vec![
                ("user".to_string(), Some("{\"id\":\"1\"}".to_string())),
                ("trades".to_string(), Some("[]".to_string())),
            ])
            .await
            .unwrap();

        let reopened = JsonFileStore::open(&dir).await.unwrap();
        assert_eq!(
            reopened.get("user").await.unwrap().as_deref(),
            Some("{\"id\":\"1\"}")
        );
        assert_eq!(reopened.get("trades").await.unwrap().as_deref(), Some("[]"));
        assert!(!reopened.path().with_extension("tmp").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_remove_key() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).await.unwrap();

        store.set("user", "x".to_string()).await.unwrap();
        store.remove("user").await.unwrap();

        let reopened = JsonFileStore::open(&dir).await.unwrap();
        assert_eq!(reopened.get("user").await.unwrap(), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("state.json"), "not json").unwrap();

        let err = JsonFileStore::open(&dir).await.err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse state file JSON"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
