use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MODE_TEXT_OPS: &str = "text_ops";
pub const MODE_QA_PAGE: &str = "qa_page";
pub const MODE_IMAGE_EXPLAIN: &str = "image_explain";
pub const MODE_FREEFORM: &str = "freeform";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    TextOps,
    QaPage,
    ImageExplain,
    Freeform,
}

impl Mode {
    /// Unrecognized tags fall back to freeform prompting
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            MODE_TEXT_OPS => Mode::TextOps,
            MODE_QA_PAGE => Mode::QaPage,
            MODE_IMAGE_EXPLAIN => Mode::ImageExplain,
            _ => Mode::Freeform,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::TextOps => MODE_TEXT_OPS,
            Mode::QaPage => MODE_QA_PAGE,
            Mode::ImageExplain => MODE_IMAGE_EXPLAIN,
            Mode::Freeform => MODE_FREEFORM,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOpsPayload {
    pub text: Option<String>,
    pub instruction: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaPagePayload {
    pub question: Option<String>,
    pub page_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageExplainPayload {
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeformPayload {
    pub prompt: Option<String>,
}

/// Normalized provider answer handed back to front-ends
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// The provider's full reply, untouched
    #[serde(rename = "raw", alias = "rawResponse")]
    pub raw_response: Value,
    pub text: String,
}
