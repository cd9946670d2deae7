use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{
    DEFAULT_MODEL, FreeformPayload, ImageExplainPayload, Mode, QaPagePayload, Settings,
    TextOpsPayload,
};

const ROLE_USER: &str = "user";

const QA_PREAMBLE: &str = "You are assisting with Q&A about the user's current web page. Use the provided page text as context.";
const IMAGE_INSTRUCTION: &str = "Explain the content of this image in clear, concise terms.";
const IMAGE_PLACEHOLDER_MIME: &str = "image/png";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// A provider call ready to send: which model, and what body
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub body: GenerateContentRequest,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }
}

fn user_turn(parts: Vec<Part>) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: ROLE_USER.to_string(),
            parts,
        }],
    }
}

fn decode<T: DeserializeOwned + Default>(mode: Mode, payload: &Value) -> CoreResult<T> {
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload.clone())
        .map_err(|e| CoreError::InvalidPayload(format!("{}: {}", mode.as_str(), e)))
}

fn required(mode: Mode, field: &str, value: Option<String>) -> CoreResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::InvalidPayload(format!(
            "{} requires `{}`",
            mode.as_str(),
            field
        ))),
    }
}

/// Maps a mode and its payload onto a `generateContent` body.
///
/// Pure: identical inputs always produce identical requests. Page text is sent
/// as given, and image requests carry the URL as text next to an empty inline
/// image part; no bytes are fetched.
pub fn build(mode: Mode, payload: &Value, settings: &Settings) -> CoreResult<ProviderRequest> {
    let body = match mode {
        Mode::TextOps => {
            let p: TextOpsPayload = decode(mode, payload)?;
            let text = required(mode, "text", p.text)?;
            let instruction = required(mode, "instruction", p.instruction)?;
            user_turn(vec![Part::text(format!("{}\n\n---\n{}", instruction, text))])
        }
        Mode::QaPage => {
            let p: QaPagePayload = decode(mode, payload)?;
            let question = required(mode, "question", p.question)?;
            let page_text = required(mode, "pageText", p.page_text)?;
            user_turn(vec![Part::text(format!(
                "{}\n\nPage text:\n{}\n\nQuestion: {}",
                QA_PREAMBLE, page_text, question
            ))])
        }
        Mode::ImageExplain => {
            let p: ImageExplainPayload = decode(mode, payload)?;
            let image_url = required(mode, "imageUrl", p.image_url)?;
            user_turn(vec![
                Part::text(IMAGE_INSTRUCTION),
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: IMAGE_PLACEHOLDER_MIME.to_string(),
                        data: String::new(),
                    },
                },
                Part::text(format!("Image URL: {}", image_url)),
            ])
        }
        Mode::Freeform => {
            let p: FreeformPayload = decode(mode, payload)?;
            user_turn(vec![Part::text(required(mode, "prompt", p.prompt)?)])
        }
    };

    let model = if settings.model.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        settings.model.clone()
    };

    Ok(ProviderRequest { model, body })
}
