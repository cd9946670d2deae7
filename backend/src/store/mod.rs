use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod local;
pub mod memory;
pub mod sqlite;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub const KEY_SETTINGS: &str = "settings";
pub const KEY_OAUTH_TOKEN: &str = "oauth_token";
pub const KEY_LOGS: &str = "interaction_logs";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone, Debug)]
pub enum StoreConfig {
    Memory,
    Local { path: PathBuf },
    Sqlite { url: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistent key-value port shared by every stateful service.
///
/// Each call is atomic on its own. A read followed by a write is not, so two
/// callers doing read-merge-write on the same key race and the last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> StoreResult<()>;
}

pub async fn open(config: &StoreConfig) -> StoreResult<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Local { path } => Arc::new(LocalStore::open(path.clone()).await?),
        StoreConfig::Sqlite { url } => Arc::new(SqliteStore::connect(url).await?),
    };
    Ok(store)
}
