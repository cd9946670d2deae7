use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{MenuItem, TabId, UiNotification};
use thiserror::Error;
use tokio::sync::broadcast;

const EVENT_BUFFER: usize = 64;

#[derive(Error, Debug)]
#[error("Host error: {0}")]
pub struct HostError(pub String);

/// Capabilities the embedding host lends to the coordinator
#[async_trait]
pub trait Host: Send + Sync {
    /// One-way push to a page UI; delivery is best effort
    async fn notify(&self, tab_id: TabId, notification: UiNotification);
    async fn open_options(&self) -> Result<(), HostError>;
    async fn inject_ui(&self, tab_id: TabId) -> Result<(), HostError>;
    /// Replaces every previously registered context-menu entry
    async fn register_menus(&self, items: &[MenuItem]) -> Result<(), HostError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Notify {
        tab_id: TabId,
        notification: UiNotification,
    },
    OpenOptions,
    InjectUi {
        tab_id: TabId,
    },
    MenusRegistered {
        items: Vec<MenuItem>,
    },
}

/// Fans host actions out to whatever surfaces are subscribed (the SSE stream
/// in the HTTP adapter).
#[derive(Clone)]
pub struct BroadcastHost {
    events: broadcast::Sender<HostEvent>,
}

impl Default for BroadcastHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastHost {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: HostEvent) -> bool {
        match self.events.send(event) {
            Ok(receivers) => {
                tracing::debug!("Host event delivered to {} subscriber(s)", receivers);
                true
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!("No subscribers for host event {:?}", event);
                false
            }
        }
    }
}

#[async_trait]
impl Host for BroadcastHost {
    async fn notify(&self, tab_id: TabId, notification: UiNotification) {
        self.publish(HostEvent::Notify {
            tab_id,
            notification,
        });
    }

    async fn open_options(&self) -> Result<(), HostError> {
        self.publish(HostEvent::OpenOptions);
        Ok(())
    }

    async fn inject_ui(&self, tab_id: TabId) -> Result<(), HostError> {
        if self.publish(HostEvent::InjectUi { tab_id }) {
            Ok(())
        } else {
            Err(HostError(format!("no page surface attached for tab {}", tab_id)))
        }
    }

    async fn register_menus(&self, items: &[MenuItem]) -> Result<(), HostError> {
        self.publish(HostEvent::MenusRegistered {
            items: items.to_vec(),
        });
        Ok(())
    }
}
