use super::settings::SettingsPatch;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TAG_GET_SETTINGS: &str = "GET_SETTINGS";
pub const TAG_SAVE_SETTINGS: &str = "SAVE_SETTINGS";
pub const TAG_GET_LOGS: &str = "GET_LOGS";
pub const TAG_CLEAR_LOGS: &str = "CLEAR_LOGS";
pub const TAG_RUN_GEMINI: &str = "RUN_GEMINI";
pub const TAG_OPEN_OPTIONS: &str = "OPEN_OPTIONS";

/// Inbound front-end request, discriminated by its `type` field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "GET_SETTINGS")]
    GetSettings,
    #[serde(rename = "SAVE_SETTINGS")]
    SaveSettings {
        #[serde(default)]
        data: Option<SettingsPatch>,
    },
    #[serde(rename = "GET_LOGS")]
    GetLogs,
    #[serde(rename = "CLEAR_LOGS")]
    ClearLogs,
    #[serde(rename = "RUN_GEMINI")]
    RunGemini {
        #[serde(default)]
        mode: Option<String>,
        #[serde(default)]
        payload: Value,
    },
    #[serde(rename = "OPEN_OPTIONS")]
    OpenOptions,
}

impl Request {
    pub const TAGS: [&'static str; 6] = [
        TAG_GET_SETTINGS,
        TAG_SAVE_SETTINGS,
        TAG_GET_LOGS,
        TAG_CLEAR_LOGS,
        TAG_RUN_GEMINI,
        TAG_OPEN_OPTIONS,
    ];

    pub fn is_known_tag(tag: &str) -> bool {
        Self::TAGS.contains(&tag)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Request::GetSettings => TAG_GET_SETTINGS,
            Request::SaveSettings { .. } => TAG_SAVE_SETTINGS,
            Request::GetLogs => TAG_GET_LOGS,
            Request::ClearLogs => TAG_CLEAR_LOGS,
            Request::RunGemini { .. } => TAG_RUN_GEMINI,
            Request::OpenOptions => TAG_OPEN_OPTIONS,
        }
    }
}

/// The single answer to every inbound request: `{ok, data?, error?}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    pub fn ok(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn ok_empty() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_gemini_decodes_mode_and_payload() {
        let req: Request = serde_json::from_value(json!({
            "type": "RUN_GEMINI",
            "mode": "freeform",
            "payload": { "prompt": "hi" }
        }))
        .unwrap();
        assert_eq!(
            req,
            Request::RunGemini {
                mode: Some("freeform".into()),
                payload: json!({ "prompt": "hi" }),
            }
        );
        assert_eq!(req.tag(), TAG_RUN_GEMINI);
    }

    #[test]
    fn empty_reply_omits_data_and_error() {
        assert_eq!(serde_json::to_value(Reply::ok_empty()).unwrap(), json!({ "ok": true }));
    }
}
