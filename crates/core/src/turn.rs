//! Turn domain types.
//!
//! One user message produces one [`ChatTurn`]: an ordered set of character
//! responses, each tagged with a pacing delay. A turn is constructed fresh
//! per user message and is immutable once delivered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The input to `submit_turn` — everything the scheduler needs to fan out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Chat session this turn belongs to
    pub session_id: String,

    /// The user speaking
    pub user_id: String,

    /// The user's message
    pub user_message: String,

    /// Characters expected to respond, in fan-out order
    pub active_character_ids: Vec<String>,

    /// Scene the conversation plays out on, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
}

/// One character's slot in a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterResponse {
    /// Which character responded
    pub character_id: String,

    /// Display name at response time
    pub character_name: String,

    /// The generated (or fallback) text
    pub content: String,

    /// Pacing delay — authoritative for delivery order, unrelated to how
    /// long generation actually took
    pub delay_ms: u64,

    /// Mood reported by the generation result
    pub mood: String,

    /// Mood intensity ∈ [0, 1]
    pub mood_intensity: f32,

    /// Whether this slot fell back after a generation failure
    #[serde(default)]
    pub error: bool,
}

/// One user message plus the ordered character responses it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Unique turn ID
    pub id: String,

    /// Session the turn was delivered into
    pub session_id: String,

    /// The user message that triggered the turn
    pub user_message: String,

    /// Responses in delivery order
    pub responses: Vec<CharacterResponse>,

    /// When the turn was created
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(session_id: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            user_message: user_message.into(),
            responses: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// How many slots fell back after generation failures.
    pub fn errored_count(&self) -> usize {
        self.responses.iter().filter(|r| r.error).count()
    }
}

/// A recent message by another character, cited in peer awareness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerMessage {
    pub character_id: String,
    pub character_name: String,
    pub content: String,
}
