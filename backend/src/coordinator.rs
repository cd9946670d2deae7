use crate::error::{CoreError, CoreResult};
use crate::gemini::GeminiClient;
use crate::host::Host;
use crate::logs::LogStore;
use crate::settings::SettingsStore;
use futures::FutureExt;
use serde_json::{Value, json};
use shared::models::{
    ActionClick, ContextMenuClick, InferenceResult, MODE_FREEFORM, MenuItem, MenuItemId, Mode,
    NewLogEntry, Preset, Reply, Request, UiNotification,
};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

const EXPLAIN_IMAGE_ACTION: &str = "explain_image";
const EMPTY_TOAST: &str = "No response";

/// Routes every inbound front-end message to its handler and answers it once.
///
/// Requests are handled independently; nothing serializes two in-flight
/// requests against each other.
#[derive(Clone)]
pub struct Coordinator {
    settings: SettingsStore,
    logs: LogStore,
    gemini: GeminiClient,
    host: Arc<dyn Host>,
}

impl Coordinator {
    pub fn new(
        settings: SettingsStore,
        logs: LogStore,
        gemini: GeminiClient,
        host: Arc<dyn Host>,
    ) -> Self {
        Self {
            settings,
            logs,
            gemini,
            host,
        }
    }

    /// Never fails: errors and panics below this point become `{ok: false}`.
    pub async fn handle(&self, message: Value) -> Reply {
        match AssertUnwindSafe(self.dispatch(message)).catch_unwind().await {
            Ok(Ok(reply)) => reply,
            Ok(Err(CoreError::UnknownMessageType)) => {
                tracing::warn!("Rejected message with unknown type");
                Reply::error(CoreError::UnknownMessageType.to_string())
            }
            Ok(Err(e)) => {
                tracing::error!("Request failed: {}", e);
                Reply::error(e.to_string())
            }
            Err(_) => {
                tracing::error!("Request handler panicked");
                Reply::error("Internal error")
            }
        }
    }

    fn parse(message: Value) -> CoreResult<Request> {
        match message.get("type").and_then(Value::as_str) {
            Some(tag) if Request::is_known_tag(tag) => Ok(serde_json::from_value(message)?),
            _ => Err(CoreError::UnknownMessageType),
        }
    }

    async fn dispatch(&self, message: Value) -> CoreResult<Reply> {
        let request = Self::parse(message)?;
        tracing::debug!(tag = request.tag(), "Dispatching message");

        let reply = match request {
            Request::GetSettings => Reply::ok(serde_json::to_value(self.settings.get().await)?),
            Request::SaveSettings { data } => {
                let saved = self.settings.save(data.unwrap_or_default()).await?;
                Reply::ok(serde_json::to_value(saved)?)
            }
            Request::GetLogs => Reply::ok(serde_json::to_value(self.logs.list().await?)?),
            Request::ClearLogs => {
                self.logs.clear().await?;
                Reply::ok_empty()
            }
            Request::RunGemini { mode, payload } => {
                let result = self.run_gemini(mode.as_deref(), payload).await?;
                Reply::ok(serde_json::to_value(result)?)
            }
            Request::OpenOptions => {
                self.host.open_options().await?;
                Reply::ok_empty()
            }
        };
        Ok(reply)
    }

    /// Invokes the provider and historizes the interaction. Failed invocations
    /// leave the history untouched.
    pub async fn run_gemini(
        &self,
        mode: Option<&str>,
        payload: Value,
    ) -> CoreResult<InferenceResult> {
        let action = mode.unwrap_or(MODE_FREEFORM);
        let result = self.gemini.invoke(Mode::from_tag(action), &payload).await?;

        self.logs
            .append(NewLogEntry::new(
                action,
                payload,
                Some(serde_json::to_value(&result)?),
            ))
            .await?;
        Ok(result)
    }

    /// Registers the context-menu entries, replacing any earlier set
    pub async fn install(&self) -> CoreResult<()> {
        self.host.register_menus(&MenuItem::defaults()).await?;
        tracing::info!("Context menus registered");
        Ok(())
    }

    pub async fn on_context_menu(&self, click: ContextMenuClick) {
        let Some(tab_id) = click.tab_id else {
            tracing::debug!("Ignoring context-menu click outside a tab");
            return;
        };

        let notification = match click.menu_item_id {
            MenuItemId::SummarizeSelection => UiNotification::ShowSearchBox {
                preset: Some(Preset::Summarize),
            },
            MenuItemId::RewriteSelection => UiNotification::ShowSearchBox {
                preset: Some(Preset::Rewrite),
            },
            MenuItemId::AskAboutPage => UiNotification::ShowSearchBox {
                preset: Some(Preset::Qa),
            },
            MenuItemId::ExplainImage => {
                let result = match self.explain_image(click.src_url.unwrap_or_default()).await {
                    Ok(text) if !text.is_empty() => text,
                    Ok(_) => EMPTY_TOAST.to_string(),
                    Err(e) => {
                        tracing::error!("Image explanation failed: {}", e);
                        e.to_string()
                    }
                };
                UiNotification::ShowResultToast { result }
            }
        };

        self.host.notify(tab_id, notification).await;
    }

    async fn explain_image(&self, image_url: String) -> CoreResult<String> {
        let result = self
            .gemini
            .invoke(Mode::ImageExplain, &json!({ "imageUrl": image_url }))
            .await?;
        self.logs
            .append(NewLogEntry::new(
                EXPLAIN_IMAGE_ACTION,
                Value::String(image_url),
                Some(serde_json::to_value(&result)?),
            ))
            .await?;
        Ok(result.text)
    }

    pub async fn on_action_clicked(&self, click: ActionClick) {
        let Some(tab_id) = click.tab_id else {
            return;
        };
        if let Err(e) = self.host.inject_ui(tab_id).await {
            tracing::error!("Failed to inject page UI: {}", e);
            return;
        }
        self.host
            .notify(tab_id, UiNotification::ShowSearchBox { preset: None })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::TokenSource;
    use crate::host::HostError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use shared::models::TabId;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        notifications: Mutex<Vec<(TabId, UiNotification)>>,
        options_opened: Mutex<usize>,
        refuse_injection: bool,
    }

    #[async_trait]
    impl Host for RecordingHost {
        async fn notify(&self, tab_id: TabId, notification: UiNotification) {
            self.notifications.lock().await.push((tab_id, notification));
        }

        async fn open_options(&self) -> Result<(), HostError> {
            *self.options_opened.lock().await += 1;
            Ok(())
        }

        async fn inject_ui(&self, _tab_id: TabId) -> Result<(), HostError> {
            if self.refuse_injection {
                Err(HostError("restricted page".into()))
            } else {
                Ok(())
            }
        }

        async fn register_menus(&self, _items: &[MenuItem]) -> Result<(), HostError> {
            Ok(())
        }
    }

    fn coordinator(host: Arc<RecordingHost>) -> Coordinator {
        let kv = Arc::new(MemoryStore::new());
        let settings = SettingsStore::new(kv.clone());
        // Unroutable base; these tests never reach the network.
        let gemini =
            GeminiClient::with_api_base(settings.clone(), TokenSource::new(kv.clone()), "http://127.0.0.1:9");
        Coordinator::new(settings, LogStore::new(kv), gemini, host)
    }

    #[tokio::test]
    async fn unknown_and_untagged_messages_are_rejected() {
        let coordinator = coordinator(Arc::default());
        for message in [
            json!({ "type": "DELETE_EVERYTHING" }),
            json!({ "mode": "freeform" }),
            json!("GET_SETTINGS"),
            Value::Null,
        ] {
            assert_eq!(
                coordinator.handle(message).await,
                Reply::error("Unknown message type")
            );
        }
    }

    #[tokio::test]
    async fn save_settings_without_data_returns_current() {
        let coordinator = coordinator(Arc::default());
        let reply = coordinator.handle(json!({ "type": "SAVE_SETTINGS" })).await;
        assert!(reply.ok);
        assert_eq!(reply.data.unwrap()["authMode"], json!("API_KEY"));
    }

    #[tokio::test]
    async fn malformed_known_message_is_an_error_reply() {
        let coordinator = coordinator(Arc::default());
        let reply = coordinator
            .handle(json!({ "type": "SAVE_SETTINGS", "data": { "authMode": "PASSWORD" } }))
            .await;
        assert!(!reply.ok);
        assert!(reply.error.unwrap().starts_with("Malformed message"));
    }

    #[tokio::test]
    async fn open_options_delegates_to_host() {
        let host = Arc::new(RecordingHost::default());
        let coordinator = coordinator(host.clone());
        assert_eq!(
            coordinator.handle(json!({ "type": "OPEN_OPTIONS" })).await,
            Reply::ok_empty()
        );
        assert_eq!(*host.options_opened.lock().await, 1);
    }

    #[tokio::test]
    async fn selection_menus_push_presets() {
        let host = Arc::new(RecordingHost::default());
        let coordinator = coordinator(host.clone());

        for id in [
            MenuItemId::SummarizeSelection,
            MenuItemId::RewriteSelection,
            MenuItemId::AskAboutPage,
        ] {
            coordinator
                .on_context_menu(ContextMenuClick {
                    menu_item_id: id,
                    tab_id: Some(3),
                    src_url: None,
                })
                .await;
        }
        coordinator
            .on_context_menu(ContextMenuClick {
                menu_item_id: MenuItemId::SummarizeSelection,
                tab_id: None,
                src_url: None,
            })
            .await;

        let presets: Vec<_> = host
            .notifications
            .lock()
            .await
            .iter()
            .map(|(tab, n)| (*tab, n.clone()))
            .collect();
        assert_eq!(
            presets,
            vec![
                (3, UiNotification::ShowSearchBox { preset: Some(Preset::Summarize) }),
                (3, UiNotification::ShowSearchBox { preset: Some(Preset::Rewrite) }),
                (3, UiNotification::ShowSearchBox { preset: Some(Preset::Qa) }),
            ]
        );
    }

    #[tokio::test]
    async fn action_click_shows_search_box_after_injection() {
        let host = Arc::new(RecordingHost::default());
        coordinator(host.clone())
            .on_action_clicked(ActionClick { tab_id: Some(9) })
            .await;
        assert_eq!(
            *host.notifications.lock().await,
            vec![(9, UiNotification::ShowSearchBox { preset: None })]
        );

        let refusing = Arc::new(RecordingHost {
            refuse_injection: true,
            ..Default::default()
        });
        coordinator(refusing.clone())
            .on_action_clicked(ActionClick { tab_id: Some(9) })
            .await;
        assert!(refusing.notifications.lock().await.is_empty());
    }

    #[tokio::test]
    async fn failed_image_explanation_still_toasts() {
        let host = Arc::new(RecordingHost::default());
        coordinator(host.clone())
            .on_context_menu(ContextMenuClick {
                menu_item_id: MenuItemId::ExplainImage,
                tab_id: Some(4),
                src_url: Some("https://example.com/a.png".into()),
            })
            .await;

        assert_eq!(
            *host.notifications.lock().await,
            vec![(
                4,
                UiNotification::ShowResultToast {
                    result: CoreError::MissingCredential.to_string()
                }
            )]
        );
    }
}
