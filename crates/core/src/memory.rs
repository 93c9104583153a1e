//! Remembered facts — the read-side of the memory system.
//!
//! How memories are extracted from conversations is out of scope here; this
//! core only consumes them during context assembly. Entries are owned by a
//! (`user_id`, `character_id`) pair in the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single remembered fact about the user, held by one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// The remembered content
    pub content: String,

    /// Free-form kind tag ("fact", "event", "preference", ...)
    pub kind: String,

    /// Importance score ∈ [0, 1]
    pub importance: f32,

    /// When this memory was formed
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    pub fn new(content: impl Into<String>, kind: impl Into<String>, importance: f32) -> Self {
        Self {
            content: content.into(),
            kind: kind.into(),
            importance,
            created_at: Utc::now(),
        }
    }
}

/// Order entries most-important-first, recency breaking ties.
///
/// Callers of the context assembler are responsible for ordering; this is
/// the ordering they use.
pub fn rank_by_importance(entries: &mut [MemoryEntry]) {
    entries.sort_by(|a, b| {
        b.importance
            .total_cmp(&a.importance)
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_puts_important_first() {
        let mut entries = vec![
            MemoryEntry::new("likes tea", "preference", 0.2),
            MemoryEntry::new("works night shifts", "fact", 0.9),
            MemoryEntry::new("afraid of spiders", "fact", 0.5),
        ];
        rank_by_importance(&mut entries);
        assert_eq!(entries[0].content, "works night shifts");
        assert_eq!(entries[2].content, "likes tea");
    }
}
