//! UI intents: declarative descriptions of a desired UI effect

use serde::{Deserialize, Serialize};

use crate::types::ObjectEntry;

/// Styling class for the status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Recognized,
    Unrecognized,
}

/// Styling class for the notification banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// One UI effect emitted by a reconciler or action handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum UiIntent {
    /// Replace badge text and class
    SetBadge { text: String, style: BadgeStyle },
    /// Show or hide the registration panel
    SetPanelVisible { visible: bool },
    /// Show or hide the speak-name control
    SetVoiceControlVisible { visible: bool },
    /// Clear the registration form fields
    ResetRegistrationForm,
    /// Replace the object tally list and total counter
    RenderObjects { entries: Vec<ObjectEntry>, total: u64 },
    /// Show a transient notification banner
    Notify {
        message: String,
        kind: NotificationKind,
    },
    /// Leave for another page
    Navigate { url: String },
}

impl UiIntent {
    pub fn badge(text: impl Into<String>, style: BadgeStyle) -> Self {
        UiIntent::SetBadge {
            text: text.into(),
            style,
        }
    }

    pub fn panel(visible: bool) -> Self {
        UiIntent::SetPanelVisible { visible }
    }

    pub fn voice_control(visible: bool) -> Self {
        UiIntent::SetVoiceControlVisible { visible }
    }

    pub fn notify(message: impl Into<String>, kind: NotificationKind) -> Self {
        UiIntent::Notify {
            message: message.into(),
            kind,
        }
    }
}
