use super::{KeyValueStore, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Row, Sqlite, sqlite::SqlitePoolOptions};

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        // In-memory databases live and die with their connection: keep exactly
        // one and never let the pool reap or recycle it.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> StoreResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("value")?;
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value) -> StoreResult<()> {
        let raw = serde_json::to_string(&value)?;
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        assert_eq!(store.get("interaction_logs").await.unwrap(), None);

        store.set("interaction_logs", json!([1])).await.unwrap();
        store.set("interaction_logs", json!([2, 1])).await.unwrap();

        assert_eq!(
            store.get("interaction_logs").await.unwrap(),
            Some(json!([2, 1]))
        );
    }

    #[tokio::test]
    async fn pool_never_recycles_its_connection() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let options = store.pool.options();
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);

        store.set("settings", json!({ "model": "m1" })).await.unwrap();
        assert_eq!(store.pool.size(), 1);
        assert_eq!(
            store.get("settings").await.unwrap(),
            Some(json!({ "model": "m1" }))
        );
    }
}
