use crate::host::HostError;
use crate::store::StoreError;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    #[error("Not authenticated. Enable API Key in Options or complete OAuth.")]
    NotAuthenticated,
    #[error("API key is empty. Add it in Options, or enable OAuth.")]
    MissingCredential,
    #[error("Gemini API error: {status} {status_text}\n{body}")]
    Provider {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("Invalid API base: {0}")]
    Endpoint(String),
    #[error("Unknown message type")]
    UnknownMessageType,
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Malformed message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Host(#[from] HostError),
}
