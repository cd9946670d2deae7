use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MODEL: &str = "models/gemini-1.5-pro-latest";
pub const DEFAULT_SEARCH_BOX_HOTKEY: &str = "Alt+G";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMode {
    #[default]
    #[serde(rename = "API_KEY")]
    ApiKey,
    #[serde(rename = "OAUTH")]
    OAuth,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub model: String,
    pub auth_mode: AuthMode,
    pub api_key: String,
    /// Only read by the page UI, which listens for it once injected
    pub search_box_hotkey: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            auth_mode: AuthMode::ApiKey,
            api_key: String::new(),
            search_box_hotkey: DEFAULT_SEARCH_BOX_HOTKEY.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("model", &self.model)
            .field("auth_mode", &self.auth_mode)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("search_box_hotkey", &self.search_box_hotkey)
            .finish()
    }
}

/// Partial settings sent by a front-end; absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<AuthMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_box_hotkey: Option<String>,
    /// Older option pages send a boolean toggle instead of `authMode`.
    /// An explicit `authMode` in the same patch takes precedence.
    #[serde(default, rename = "useOAuth", skip_serializing_if = "Option::is_none")]
    pub use_oauth: Option<bool>,
}

impl SettingsPatch {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(model) = self.model {
            settings.model = model;
        }
        if let Some(use_oauth) = self.use_oauth {
            settings.auth_mode = if use_oauth {
                AuthMode::OAuth
            } else {
                AuthMode::ApiKey
            };
        }
        if let Some(auth_mode) = self.auth_mode {
            settings.auth_mode = auth_mode;
        }
        if let Some(api_key) = self.api_key {
            settings.api_key = api_key;
        }
        if let Some(hotkey) = self.search_box_hotkey {
            settings.search_box_hotkey = hotkey;
        }
    }
}
