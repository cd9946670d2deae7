use super::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Whole-document JSON file store. The file is rewritten on every `set`.
pub struct LocalStore {
    path: PathBuf,
    document: RwLock<Map<String, Value>>,
}

impl LocalStore {
    pub async fn open(path: PathBuf) -> StoreResult<Self> {
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store file {}: {}", path.display(), e);
                Map::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let document = self.document.read().await;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let mut document = self.document.write().await;
        let mut next = document.clone();
        next.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&next)?;
        tokio::fs::write(&self.path, content).await?;
        *document = next;
        Ok(())
    }
}
