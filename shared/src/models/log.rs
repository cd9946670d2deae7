use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Maximum number of entries retained in the interaction history
pub const LOG_CAPACITY: usize = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    /// Milliseconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub action: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub action: String,
    pub input: Value,
    pub output: Option<Value>,
}

impl NewLogEntry {
    pub fn new(action: impl Into<String>, input: Value, output: Option<Value>) -> Self {
        Self {
            action: action.into(),
            input,
            output,
        }
    }

    pub fn into_entry(self, timestamp: i64) -> LogEntry {
        LogEntry {
            id: Uuid::now_v7(),
            timestamp,
            action: self.action,
            input: self.input,
            output: self.output,
        }
    }
}
