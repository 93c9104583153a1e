//! RecordStore trait — the abstraction over the persistence collaborator.
//!
//! The store holds characters, hidden-default markers, personas, scenes,
//! memories, and relationship state. It is a dumb record store: the
//! shadowing rules (which defaults a user actually sees) are computed by the
//! roster from the three primitive character reads, so every backend stays
//! free of visibility logic.

use async_trait::async_trait;

use crate::character::CharacterRecord;
use crate::error::StoreError;
use crate::memory::MemoryEntry;
use crate::persona::UserPersona;
use crate::relationship::RelationshipState;
use crate::scene::Scene;

/// The persistence collaborator.
///
/// Implementations: in-memory (ensemble-store, for dev/tests); production
/// backends live outside this repository.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The backend name (e.g. "memory", "postgres").
    fn name(&self) -> &str;

    /// The stock catalog, in catalog order.
    async fn default_characters(&self) -> Result<Vec<CharacterRecord>, StoreError>;

    /// All records owned by a user, most-recently-created first.
    async fn owned_characters(&self, user_id: &str) -> Result<Vec<CharacterRecord>, StoreError>;

    /// One owned record by ID.
    async fn owned_character(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<CharacterRecord>, StoreError>;

    /// Insert or replace an owned record.
    async fn upsert_owned_character(&self, record: CharacterRecord) -> Result<(), StoreError>;

    /// Remove an owned record. Returns whether anything was removed.
    async fn remove_owned_character(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<bool, StoreError>;

    /// Stock character IDs hidden from this user.
    async fn hidden_defaults(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Mark a stock character hidden for this user. Idempotent.
    async fn set_hidden_default(&self, user_id: &str, character_id: &str)
    -> Result<(), StoreError>;

    /// The user's active persona, if one exists.
    async fn active_persona(&self, user_id: &str) -> Result<Option<UserPersona>, StoreError>;

    /// Store a persona as active, flipping any previous active record to
    /// inactive. Old personas are kept as history, never deleted.
    async fn set_active_persona(&self, persona: UserPersona) -> Result<(), StoreError>;

    /// Remembered facts for one (user, character) pair, unordered.
    async fn memories(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Vec<MemoryEntry>, StoreError>;

    /// Relationship state for one (user, character) pair.
    async fn relationship(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<RelationshipState>, StoreError>;

    /// Look up a scene by ID.
    async fn scene(&self, scene_id: &str) -> Result<Option<Scene>, StoreError>;
}
