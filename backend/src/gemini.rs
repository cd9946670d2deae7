use crate::error::{CoreError, CoreResult};
use crate::request;
use crate::settings::SettingsStore;
use crate::store::{KEY_OAUTH_TOKEN, KeyValueStore};
use serde_json::Value;
use shared::models::{AuthMode, InferenceResult, Mode};
use std::sync::Arc;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reads a previously cached OAuth token. Never starts an interactive flow.
#[derive(Clone)]
pub struct TokenSource {
    store: Arc<dyn KeyValueStore>,
}

impl TokenSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn cached_token(&self) -> CoreResult<Option<String>> {
        let token = self
            .store
            .get(KEY_OAUTH_TOKEN)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|t| !t.is_empty());
        Ok(token)
    }
}

enum Credential {
    Bearer(String),
    ApiKey(String),
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    settings: SettingsStore,
    tokens: TokenSource,
}

impl GeminiClient {
    pub fn new(settings: SettingsStore, tokens: TokenSource) -> Self {
        Self::with_api_base(settings, tokens, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        settings: SettingsStore,
        tokens: TokenSource,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            settings,
            tokens,
        }
    }

    async fn credential(&self, auth_mode: AuthMode, api_key: &str) -> CoreResult<Credential> {
        match auth_mode {
            AuthMode::OAuth => match self.tokens.cached_token().await? {
                Some(token) => Ok(Credential::Bearer(token)),
                None => Err(CoreError::NotAuthenticated),
            },
            AuthMode::ApiKey => {
                let key = api_key.trim();
                if key.is_empty() {
                    Err(CoreError::MissingCredential)
                } else {
                    Ok(Credential::ApiKey(key.to_string()))
                }
            }
        }
    }

    /// Issues one `generateContent` call. No retries; transport defaults
    /// govern timeouts.
    pub async fn invoke(&self, mode: Mode, payload: &Value) -> CoreResult<InferenceResult> {
        let settings = self.settings.get().await;
        let credential = self
            .credential(settings.auth_mode, &settings.api_key)
            .await?;
        let request = request::build(mode, payload, &settings)?;

        let endpoint = generate_endpoint(&self.api_base, &request.model)?;
        tracing::info!(mode = mode.as_str(), model = %request.model, "Calling Gemini");

        let builder = self.http.post(endpoint).json(&request.body);
        let builder = match &credential {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::ApiKey(key) => builder.query(&[("key", key)]),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Gemini returned an error status");
            return Err(CoreError::Provider {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let raw_response: Value = response.json().await?;
        let text = extract_text(&raw_response);
        tracing::debug!(chars = text.len(), "Gemini response received");

        Ok(InferenceResult { raw_response, text })
    }
}

/// `{api_base}/{model}:generateContent`, with each `/`-separated piece of the
/// model id percent-encoded as its own path segment.
pub fn generate_endpoint(api_base: &str, model: &str) -> CoreResult<reqwest::Url> {
    let mut url = reqwest::Url::parse(api_base)
        .map_err(|e| CoreError::Endpoint(format!("{}: {}", api_base, e)))?;

    let mut segments: Vec<&str> = model.split('/').filter(|s| !s.is_empty()).collect();
    let method = format!("{}:generateContent", segments.pop().unwrap_or_default());
    url.path_segments_mut()
        .map_err(|_| CoreError::Endpoint(api_base.to_string()))?
        .pop_if_empty()
        .extend(segments)
        .push(&method);
    Ok(url)
}

/// Newline-joined text parts of the first candidate, empty when absent
pub fn extract_text(response: &Value) -> String {
    response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}
