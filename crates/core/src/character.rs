//! Character domain types.
//!
//! A [`CharacterRecord`] is either a *stock* entry in the shared catalog
//! (`is_default = true`, no owner) or a user-owned record. A user-owned
//! record that carries an `original_id` is an *override*: it shadows the
//! stock entry it was copied from in that user's visible set. Stock records
//! are never mutated — editing one goes through copy-on-write in the roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generate::ModelConfig;

/// Minimum age for any character.
pub const MIN_AGE: u32 = 18;
/// Personality length bounds, in characters.
pub const PERSONALITY_MIN_LEN: usize = 20;
pub const PERSONALITY_MAX_LEN: usize = 1000;
/// Sampling temperature bounds.
pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 2.0;
/// Response token bounds.
pub const MAX_TOKENS_MIN: u32 = 50;
pub const MAX_TOKENS_MAX: u32 = 1000;
/// Context window bounds, in tokens.
pub const CONTEXT_WINDOW_MIN: u32 = 1000;
pub const CONTEXT_WINDOW_MAX: u32 = 32000;

/// How a character is pictured in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Avatar {
    /// A single emoji glyph.
    Emoji(String),
    /// A reference to an uploaded image (storage key, not a URL).
    Image(String),
}

impl Default for Avatar {
    fn default() -> Self {
        Self::Emoji("🙂".into())
    }
}

/// One example exchange used for style priming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExample {
    pub user: String,
    pub character: String,
}

/// A declared relationship to another named character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterLink {
    pub target_character_id: String,
    pub target_name: String,
    pub description: String,
}

/// A character, stock or user-owned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    /// Unique character ID
    pub id: String,

    /// Whether this is a stock catalog entry
    #[serde(default)]
    pub is_default: bool,

    /// Set only on an override: the stock character this record shadows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,

    /// Owner; absent for stock entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Display name
    pub name: String,

    /// Age in years (always ≥ 18)
    pub age: u32,

    /// Sex / gender presentation, free text
    pub sex: String,

    /// Personality description (required, 20–1000 chars)
    pub personality: String,

    /// Physical appearance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,

    /// Backstory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,

    /// Avatar shown next to messages
    #[serde(default)]
    pub avatar: Avatar,

    /// UI color token
    #[serde(default = "default_color")]
    pub color: String,

    /// Sampling temperature ∈ [0, 2]
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Response length cap ∈ [50, 1000]
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Context window ∈ [1000, 32000]
    #[serde(default = "default_context_window")]
    pub context_window: u32,

    /// Whether remembered facts are fed into this character's context
    #[serde(default = "default_true")]
    pub memory_enabled: bool,

    /// Example exchanges, in stored order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chat_examples: Vec<ChatExample>,

    /// Declared relationships to other characters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<CharacterLink>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

fn default_color() -> String {
    "slate".into()
}
fn default_temperature() -> f32 {
    0.8
}
fn default_max_tokens() -> u32 {
    300
}
fn default_context_window() -> u32 {
    8000
}
fn default_true() -> bool {
    true
}

impl CharacterRecord {
    /// Create a stock catalog entry.
    pub fn stock(
        id: impl Into<String>,
        name: impl Into<String>,
        age: u32,
        sex: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            is_default: true,
            original_id: None,
            user_id: None,
            name: name.into(),
            age,
            sex: sex.into(),
            personality: personality.into(),
            appearance: None,
            background: None,
            avatar: Avatar::default(),
            color: default_color(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_window: default_context_window(),
            memory_enabled: true,
            chat_examples: Vec::new(),
            relationships: Vec::new(),
            tags: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether this record shadows a stock entry.
    pub fn is_override(&self) -> bool {
        self.original_id.is_some()
    }

    /// The behavioral knobs passed to the generation collaborator.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            context_window: self.context_window,
        }
    }
}

/// A character submission: every field optional.
///
/// This is both the shape validated by the gate and the `edits` argument of
/// the roster's copy-on-write path. Omitted fields inherit from the record
/// the draft is applied to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_examples: Option<Vec<ChatExample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<CharacterLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CharacterDraft {
    /// Merge this draft over `base`: present fields win, omitted fields keep
    /// the base value. Ownership fields (`id`, `is_default`, `original_id`,
    /// `user_id`, `created_at`) are never taken from a draft.
    pub fn apply_to(&self, base: &CharacterRecord) -> CharacterRecord {
        let mut record = base.clone();
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(sex) = &self.sex {
            record.sex = sex.clone();
        }
        if let Some(personality) = &self.personality {
            record.personality = personality.clone();
        }
        if let Some(appearance) = &self.appearance {
            record.appearance = Some(appearance.clone());
        }
        if let Some(background) = &self.background {
            record.background = Some(background.clone());
        }
        if let Some(avatar) = &self.avatar {
            record.avatar = avatar.clone();
        }
        if let Some(color) = &self.color {
            record.color = color.clone();
        }
        if let Some(temperature) = self.temperature {
            record.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            record.max_tokens = max_tokens;
        }
        if let Some(context_window) = self.context_window {
            record.context_window = context_window;
        }
        if let Some(memory_enabled) = self.memory_enabled {
            record.memory_enabled = memory_enabled;
        }
        if let Some(chat_examples) = &self.chat_examples {
            record.chat_examples = chat_examples.clone();
        }
        if let Some(relationships) = &self.relationships {
            record.relationships = relationships.clone();
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        record
    }

    /// Materialize the override created when a user first edits a stock
    /// character: a fresh owned record seeded from the stock entry, with
    /// this draft's fields applied over it.
    pub fn to_override(&self, stock: &CharacterRecord, user_id: &str) -> CharacterRecord {
        let mut record = self.apply_to(stock);
        record.id = Uuid::new_v4().to_string();
        record.is_default = false;
        record.original_id = Some(stock.id.clone());
        record.user_id = Some(user_id.to_string());
        record.created_at = Utc::now();
        record
    }
}

impl From<&CharacterRecord> for CharacterDraft {
    fn from(record: &CharacterRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            age: Some(record.age),
            sex: Some(record.sex.clone()),
            personality: Some(record.personality.clone()),
            appearance: record.appearance.clone(),
            background: record.background.clone(),
            avatar: Some(record.avatar.clone()),
            color: Some(record.color.clone()),
            temperature: Some(record.temperature),
            max_tokens: Some(record.max_tokens),
            context_window: Some(record.context_window),
            memory_enabled: Some(record.memory_enabled),
            chat_examples: Some(record.chat_examples.clone()),
            relationships: Some(record.relationships.clone()),
            tags: Some(record.tags.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_zoe() -> CharacterRecord {
        CharacterRecord::stock(
            "default_zoe",
            "Zoe",
            24,
            "female",
            "sarcastic tech enthusiast with a soft spot for retro hardware",
        )
    }

    #[test]
    fn stock_record_has_no_owner() {
        let zoe = stock_zoe();
        assert!(zoe.is_default);
        assert!(zoe.user_id.is_none());
        assert!(zoe.original_id.is_none());
        assert!(!zoe.is_override());
    }

    #[test]
    fn draft_apply_keeps_omitted_fields() {
        let zoe = stock_zoe();
        let draft = CharacterDraft {
            name: Some("Zoe Prime".into()),
            ..Default::default()
        };
        let merged = draft.apply_to(&zoe);
        assert_eq!(merged.name, "Zoe Prime");
        assert_eq!(merged.personality, zoe.personality);
        assert_eq!(merged.age, zoe.age);
    }

    #[test]
    fn to_override_links_back_to_stock() {
        let zoe = stock_zoe();
        let draft = CharacterDraft {
            appearance: Some("green hair, band t-shirt".into()),
            ..Default::default()
        };
        let owned = draft.to_override(&zoe, "user_1");
        assert!(!owned.is_default);
        assert!(owned.is_override());
        assert_eq!(owned.original_id.as_deref(), Some("default_zoe"));
        assert_eq!(owned.user_id.as_deref(), Some("user_1"));
        assert_ne!(owned.id, zoe.id);
        // Inherited from the stock entry
        assert_eq!(owned.personality, zoe.personality);
        // From the draft
        assert_eq!(owned.appearance.as_deref(), Some("green hair, band t-shirt"));
    }

    #[test]
    fn record_serialization_roundtrip() {
        let zoe = stock_zoe();
        let json = serde_json::to_string(&zoe).unwrap();
        let parsed: CharacterRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Zoe");
        assert_eq!(parsed.avatar, Avatar::default());
    }

    #[test]
    fn model_config_mirrors_behavioral_fields() {
        let mut zoe = stock_zoe();
        zoe.temperature = 1.2;
        zoe.max_tokens = 500;
        let config = zoe.model_config();
        assert!((config.temperature - 1.2).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.context_window, zoe.context_window);
    }
}
