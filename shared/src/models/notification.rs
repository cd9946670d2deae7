use serde::{Deserialize, Serialize};

pub type TabId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Summarize,
    Rewrite,
    Qa,
}

/// One-way push to a page UI. Never answered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiNotification {
    #[serde(rename = "SHOW_SEARCH_BOX")]
    ShowSearchBox {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preset: Option<Preset>,
    },
    #[serde(rename = "SHOW_RESULT_TOAST")]
    ShowResultToast { result: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Selection,
    Image,
    Page,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItemId {
    #[serde(rename = "gemini_summarize_selection")]
    SummarizeSelection,
    #[serde(rename = "gemini_rewrite_selection")]
    RewriteSelection,
    #[serde(rename = "gemini_explain_image")]
    ExplainImage,
    #[serde(rename = "gemini_ask_about_page")]
    AskAboutPage,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub title: String,
    pub contexts: Vec<MenuContext>,
}

impl MenuItem {
    fn new(id: MenuItemId, title: &str, context: MenuContext) -> Self {
        Self {
            id,
            title: title.to_string(),
            contexts: vec![context],
        }
    }

    /// The context-menu entries registered on install
    pub fn defaults() -> Vec<MenuItem> {
        vec![
            Self::new(
                MenuItemId::SummarizeSelection,
                "Gemini: Summarize Selection",
                MenuContext::Selection,
            ),
            Self::new(
                MenuItemId::RewriteSelection,
                "Gemini: Rewrite Selection",
                MenuContext::Selection,
            ),
            Self::new(
                MenuItemId::ExplainImage,
                "Gemini: Explain Image",
                MenuContext::Image,
            ),
            Self::new(
                MenuItemId::AskAboutPage,
                "Gemini: Ask about this page…",
                MenuContext::Page,
            ),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenuClick {
    pub menu_item_id: MenuItemId,
    #[serde(default)]
    pub tab_id: Option<TabId>,
    /// Source of the clicked image, present for image contexts
    #[serde(default)]
    pub src_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionClick {
    #[serde(default)]
    pub tab_id: Option<TabId>,
}
