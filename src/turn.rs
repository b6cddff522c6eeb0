//! Canonical turn model
//!
//! One incoming webhook call, normalized across the three assistant
//! platforms, plus the abstract response the dialog engine produces.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Platforms respond poorly to walls of text; anything longer is cut,
/// not rejected.
pub const MAX_RESPONSE_TEXT: usize = 1024;

/// Originating voice-assistant platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Alice,
    Marusia,
    Sber,
}

impl Platform {
    /// Identifier stored in the `users` table.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Platform::Alice => "YANDEX",
            Platform::Marusia => "VK",
            Platform::Sber => "SBER",
        }
    }
}

/// One recognized intent with its flattened slot map.
#[derive(Debug, Clone, Default)]
pub struct Intent {
    pub name: String,
    pub slots: HashMap<String, String>,
}

impl Intent {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: HashMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(name.into(), value.into());
        self
    }
}

/// Typed value extracted from the utterance independent of intent.
/// Only relative dates are consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// 0 = today, 1 = tomorrow.
    RelativeDay(u8),
}

/// State blob round-tripped through the platform between turns.
///
/// The engine owns `scene` and `group`; every other key received in
/// the state envelope is echoed back unchanged via `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Platform-agnostic view of one incoming webhook call.
#[derive(Debug, Clone)]
pub struct Turn {
    pub platform: Platform,
    /// First non-empty candidate of the platform's identity list;
    /// `None` means the turn is anonymous.
    pub caller_id: Option<String>,
    /// Lowercased utterance used for matching.
    pub command: String,
    /// Raw utterance, for logging and fallback messages.
    pub original_text: String,
    pub intents: Vec<Intent>,
    pub entities: Vec<Entity>,
    pub is_session_new: bool,
    pub state: DialogState,
}

impl Turn {
    /// The single intent this turn is routed on.
    ///
    /// Upstream NLU guarantees at most one intent per turn; if a
    /// platform ever sends several, only the first is consulted.
    pub fn primary_intent(&self) -> Option<&Intent> {
        if self.intents.len() > 1 {
            tracing::warn!(
                count = self.intents.len(),
                "multiple intents in one turn, consulting the first only"
            );
        }
        self.intents.first()
    }

    pub fn has_intent(&self, name: &str) -> bool {
        self.intents.iter().any(|i| i.name == name)
    }

    /// Slot value from the primary intent.
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.primary_intent()
            .and_then(|i| i.slots.get(name))
            .map(String::as_str)
    }

    /// First relative-date entity, if any. First entity wins.
    pub fn relative_day(&self) -> Option<u8> {
        self.entities.first().map(|Entity::RelativeDay(d)| *d)
    }
}

/// Button attached to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub title: String,
    pub payload: Option<String>,
    pub url: Option<String>,
    pub hide: bool,
}

impl Button {
    /// A hideable suggestion chip, the only kind the skill uses.
    pub fn suggestion(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: None,
            url: None,
            hide: true,
        }
    }
}

/// Abstract response, translated to the platform wire shape by the
/// adapter that produced the turn.
#[derive(Debug, Clone)]
pub struct SkillResponse {
    pub text: String,
    pub tts: String,
    pub buttons: Vec<Button>,
    pub end_session: bool,
    pub state: DialogState,
}

impl SkillResponse {
    /// Build a response, truncating over-long text and deriving the
    /// spoken form (newlines read poorly, so they become ", ").
    pub fn new(text: impl Into<String>, state: DialogState) -> Self {
        let mut text = text.into();
        if let Some((idx, _)) = text.char_indices().nth(MAX_RESPONSE_TEXT) {
            text.truncate(idx);
        }
        let tts = text.replace('\n', ", ");
        Self {
            text,
            tts,
            buttons: Vec::new(),
            end_session: false,
            state,
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn ending_session(mut self) -> Self {
        self.end_session = true;
        self
    }
}
