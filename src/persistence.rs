//! Durable key-value slots and the review ledger stored in one of them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::aggregates::ReviewLedger;

/// Slot holding the whole review ledger.
pub const REVIEWS_KEY: &str = "lumiere_reviews";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// A durable string store addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a slot. `None` when nothing was ever written.
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Replaces a slot's content.
    async fn set(&self, key: &str, value: &str) -> PersistenceResult<()>;
}

/// One `<key>.json` file per slot under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }
    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid { return Err(PersistenceError::InvalidKey(key.to_string())); }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)?).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        // Replaced atomically via rename.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// In-memory store for testing purposes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.slots.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the ledger as a single JSON blob.
#[derive(Clone)]
pub struct LedgerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LedgerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self { Self { store } }

    /// Missing, unreadable or malformed data all load as an empty ledger.
    pub async fn load(&self) -> ReviewLedger {
        let raw = match self.store.get(REVIEWS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return ReviewLedger::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read review ledger, starting empty");
                return ReviewLedger::new();
            }
        };
        match serde_json::from_str::<ReviewLedger>(&raw) {
            Ok(ledger) => {
                tracing::info!(reviews = ledger.total_reviews(), "Loaded review ledger");
                ledger
            }
            Err(e) => {
                tracing::warn!(error = %e, "Review ledger is corrupt, starting empty");
                ReviewLedger::new()
            }
        }
    }

    pub async fn persist(&self, ledger: &ReviewLedger) -> PersistenceResult<()> {
        let raw = serde_json::to_string(ledger)?;
        self.store.set(REVIEWS_KEY, &raw).await
    }
}
