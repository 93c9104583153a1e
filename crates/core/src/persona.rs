//! User persona — who the characters believe they are talking to.
//!
//! A user keeps a history of personas but exactly one is active at any time;
//! activating a new one flips the previous active record to inactive. The
//! record store enforces the flip, this module only models the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persona record. Never deleted — deactivated records remain as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPersona {
    /// Unique persona ID
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Name the characters address the user by
    pub name: String,

    /// Self-description fed into character contexts
    pub personality: String,

    /// Interests, rendered as a joined list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,

    /// Whether this is the user's current persona
    #[serde(default)]
    pub is_active: bool,

    /// When this persona was created
    pub created_at: DateTime<Utc>,
}

impl UserPersona {
    /// Create a new active persona.
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        personality: impl Into<String>,
        interests: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: name.into(),
            personality: personality.into(),
            interests,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
