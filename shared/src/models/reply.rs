use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the core hands back to the presentation layer for every inbound
/// message. Rendering (rich cards, quick-reply buttons) is external; the
/// prompt kind tells the renderer which affordance to attach and the
/// payload carries structured data such as result lists or suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    None,
    Menu(Menu),
    /// A lone cancel affordance, shown mid-flow
    Cancel,
    DatePicker,
}

/// Named quick-reply menus the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Menu {
    Main,
    Admin,
    Contacts,
    Search,
    Edit,
    Notify,
    ConfirmDelete,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt: Prompt::None,
            payload: None,
        }
    }

    pub fn menu(text: impl Into<String>, menu: Menu) -> Self {
        Self {
            text: text.into(),
            prompt: Prompt::Menu(menu),
            payload: None,
        }
    }

    pub fn cancelable(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt: Prompt::Cancel,
            payload: None,
        }
    }

    pub fn date_picker(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prompt: Prompt::DatePicker,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
