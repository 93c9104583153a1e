//! Relationship state — the read-side of the relationship system.
//!
//! Score update formulas are out of scope; context assembly only reads the
//! current state for one (`user_id`, `character_id`) pair.

use serde::{Deserialize, Serialize};

/// The evolving relationship between a user and one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipState {
    /// Label such as "stranger", "friend", "confidant"
    pub relationship_type: String,

    /// How well the character knows the user ∈ [0, 1]
    pub familiarity: f32,

    /// How much the character trusts the user ∈ [0, 1]
    pub trust: f32,

    /// Emotional attachment ∈ [-1, 1]
    pub emotional_bond: f32,

    /// Number of interactions recorded
    pub interaction_count: u32,
}

impl Default for RelationshipState {
    fn default() -> Self {
        Self {
            relationship_type: "stranger".into(),
            familiarity: 0.0,
            trust: 0.0,
            emotional_bond: 0.0,
            interaction_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_stranger() {
        let state = RelationshipState::default();
        assert_eq!(state.relationship_type, "stranger");
        assert_eq!(state.interaction_count, 0);
    }
}
