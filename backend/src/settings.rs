use crate::store::{KEY_SETTINGS, KeyValueStore, StoreResult};
use shared::models::{Settings, SettingsPatch};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted settings over defaults. Keys missing from the stored document
    /// take their default; an unreadable document yields pure defaults.
    pub async fn get(&self) -> Settings {
        let stored = match self.store.get(KEY_SETTINGS).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to read settings, using defaults: {}", e);
                None
            }
        };

        match stored {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Stored settings are malformed, using defaults: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    /// Shallow-merges `patch` over the current settings and persists the result.
    /// Not atomic against a concurrent `save`: the last write wins.
    pub async fn save(&self, patch: SettingsPatch) -> StoreResult<Settings> {
        let mut settings = self.get().await;
        patch.apply(&mut settings);
        self.store
            .set(KEY_SETTINGS, serde_json::to_value(&settings)?)
            .await?;
        tracing::debug!(model = %settings.model, "Settings saved");
        Ok(settings)
    }
}
