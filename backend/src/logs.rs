use crate::store::{KEY_LOGS, KeyValueStore, StoreResult};
use serde_json::Value;
use shared::models::{LOG_CAPACITY, LogEntry, NewLogEntry};
use std::sync::Arc;

/// Newest-first interaction history, bounded to [`LOG_CAPACITY`] entries.
#[derive(Clone)]
pub struct LogStore {
    store: Arc<dyn KeyValueStore>,
}

impl LogStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, entry: NewLogEntry) -> StoreResult<LogEntry> {
        let entry = entry.into_entry(chrono::Utc::now().timestamp_millis());

        let mut logs = self.list().await?;
        logs.insert(0, entry.clone());
        logs.truncate(LOG_CAPACITY);
        self.store.set(KEY_LOGS, serde_json::to_value(&logs)?).await?;

        tracing::debug!(id = %entry.id, action = %entry.action, "Log entry appended");
        Ok(entry)
    }

    /// Stored entries that no longer decode are skipped with a warning.
    pub async fn list(&self) -> StoreResult<Vec<LogEntry>> {
        let entries = match self.store.get(KEY_LOGS).await? {
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                tracing::warn!("Stored history is not a list, treating it as empty");
                return Ok(Vec::new());
            }
            None => return Ok(Vec::new()),
        };

        Ok(entries
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<LogEntry>(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping malformed log entry: {}", e);
                    None
                }
            })
            .collect())
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.store
            .set(KEY_LOGS, Value::Array(Vec::new()))
            .await
    }
}
