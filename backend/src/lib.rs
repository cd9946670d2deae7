pub mod coordinator;
pub mod error;
pub mod gemini;
mod handlers;
pub mod host;
pub mod logs;
pub mod request;
pub mod settings;
pub mod store;

use crate::coordinator::Coordinator;
use crate::gemini::{DEFAULT_API_BASE, GeminiClient, TokenSource};
use crate::handlers::{action_clicked, context_menu_clicked, events, handle_message, install};
use crate::host::BroadcastHost;
use crate::logs::LogStore;
use crate::settings::SettingsStore;
use crate::store::{StoreConfig, StoreResult};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub api_base: String,
    pub store: StoreConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            store: StoreConfig::Memory,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Coordinator,
    pub host: BroadcastHost,
}

impl AppState {
    /// Builds the process-wide services once; every handler shares them.
    pub async fn open(config: &BackendConfig) -> StoreResult<Self> {
        let kv = store::open(&config.store).await?;
        let host = BroadcastHost::new();

        let settings = SettingsStore::new(kv.clone());
        let gemini = GeminiClient::with_api_base(
            settings.clone(),
            TokenSource::new(kv.clone()),
            config.api_base.clone(),
        );
        let coordinator = Coordinator::new(
            settings,
            LogStore::new(kv),
            gemini,
            Arc::new(host.clone()),
        );

        Ok(Self { coordinator, host })
    }
}

pub async fn init(router: Router<AppState>, config: BackendConfig) -> StoreResult<Router<()>> {
    let state = AppState::open(&config).await?;
    if let Err(e) = state.coordinator.install().await {
        tracing::warn!("Context menus not registered: {}", e);
    }

    Ok(router
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/message", post(handle_message))
        .route("/api/triggers/context-menu", post(context_menu_clicked))
        .route("/api/triggers/action", post(action_clicked))
        .route("/api/install", post(install))
        .route("/api/events", get(events))
        .layer(CorsLayer::permissive())
        .with_state(state))
}
