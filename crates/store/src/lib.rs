//! In-memory implementation of the record-store collaborator.
//!
//! `MemStore` backs the engine's tests and the runnable example. Production
//! deployments plug a real database behind the same trait; nothing in the
//! engine knows the difference.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use ensemble_core::character::CharacterRecord;
use ensemble_core::error::StoreError;
use ensemble_core::memory::MemoryEntry;
use ensemble_core::persona::UserPersona;
use ensemble_core::relationship::RelationshipState;
use ensemble_core::scene::Scene;
use ensemble_core::store::RecordStore;

#[derive(Default)]
struct Inner {
    /// Stock catalog, in catalog order.
    defaults: Vec<CharacterRecord>,
    /// All owned records, across users.
    owned: Vec<CharacterRecord>,
    /// Hidden-default markers: (user_id, character_id).
    hidden: HashSet<(String, String)>,
    /// Persona history, across users.
    personas: Vec<UserPersona>,
    /// Memories keyed by (user_id, character_id).
    memories: HashMap<(String, String), Vec<MemoryEntry>>,
    /// Relationship state keyed by (user_id, character_id).
    relationships: HashMap<(String, String), RelationshipState>,
    /// Scenes by ID.
    scenes: HashMap<String, Scene>,
}

/// An in-memory record store.
pub struct MemStore {
    inner: RwLock<Inner>,
    /// When set, every operation fails with `StoreError::Unavailable` —
    /// lets tests exercise outage handling.
    unavailable: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Add a stock catalog entry. Catalog order is insertion order.
    pub async fn seed_default(&self, record: CharacterRecord) {
        let mut inner = self.inner.write().await;
        inner.defaults.push(record);
    }

    /// Add a scene.
    pub async fn seed_scene(&self, scene: Scene) {
        let mut inner = self.inner.write().await;
        inner.scenes.insert(scene.id.clone(), scene);
    }

    /// Add a remembered fact for one (user, character) pair.
    pub async fn seed_memory(&self, user_id: &str, character_id: &str, entry: MemoryEntry) {
        let mut inner = self.inner.write().await;
        inner
            .memories
            .entry((user_id.to_string(), character_id.to_string()))
            .or_default()
            .push(entry);
    }

    /// Set the relationship state for one (user, character) pair.
    pub async fn seed_relationship(
        &self,
        user_id: &str,
        character_id: &str,
        state: RelationshipState,
    ) {
        let mut inner = self.inner.write().await;
        inner
            .relationships
            .insert((user_id.to_string(), character_id.to_string()), state);
    }

    /// Simulate a store outage (or recovery).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store marked unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn default_characters(&self) -> Result<Vec<CharacterRecord>, StoreError> {
        self.check_available()?;
        Ok(self.inner.read().await.defaults.clone())
    }

    async fn owned_characters(&self, user_id: &str) -> Result<Vec<CharacterRecord>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        let mut records: Vec<CharacterRecord> = inner
            .owned
            .iter()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn owned_character(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<CharacterRecord>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .owned
            .iter()
            .find(|c| c.id == character_id && c.user_id.as_deref() == Some(user_id))
            .cloned())
    }

    async fn upsert_owned_character(&self, record: CharacterRecord) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        debug!(character_id = %record.id, "Upserting owned character");
        match inner.owned.iter_mut().find(|c| c.id == record.id) {
            Some(existing) => *existing = record,
            None => inner.owned.push(record),
        }
        Ok(())
    }

    async fn remove_owned_character(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        let before = inner.owned.len();
        inner
            .owned
            .retain(|c| !(c.id == character_id && c.user_id.as_deref() == Some(user_id)));
        Ok(inner.owned.len() != before)
    }

    async fn hidden_defaults(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .hidden
            .iter()
            .filter(|(u, _)| u == user_id)
            .map(|(_, c)| c.clone())
            .collect())
    }

    async fn set_hidden_default(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        inner
            .hidden
            .insert((user_id.to_string(), character_id.to_string()));
        Ok(())
    }

    async fn active_persona(&self, user_id: &str) -> Result<Option<UserPersona>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .personas
            .iter()
            .find(|p| p.user_id == user_id && p.is_active)
            .cloned())
    }

    async fn set_active_persona(&self, persona: UserPersona) -> Result<(), StoreError> {
        self.check_available()?;
        let mut inner = self.inner.write().await;
        // Flip the previous active record; history is kept, never deleted.
        for existing in inner
            .personas
            .iter_mut()
            .filter(|p| p.user_id == persona.user_id)
        {
            existing.is_active = false;
        }
        inner.personas.push(persona);
        Ok(())
    }

    async fn memories(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Vec<MemoryEntry>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .memories
            .get(&(user_id.to_string(), character_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn relationship(
        &self,
        user_id: &str,
        character_id: &str,
    ) -> Result<Option<RelationshipState>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner
            .relationships
            .get(&(user_id.to_string(), character_id.to_string()))
            .cloned())
    }

    async fn scene(&self, scene_id: &str) -> Result<Option<Scene>, StoreError> {
        self.check_available()?;
        let inner = self.inner.read().await;
        Ok(inner.scenes.get(scene_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(id: &str, name: &str) -> CharacterRecord {
        CharacterRecord::stock(id, name, 30, "female", "a perfectly serviceable test personality")
    }

    #[tokio::test]
    async fn defaults_keep_catalog_order() {
        let store = MemStore::new();
        store.seed_default(stock("a", "Ada")).await;
        store.seed_default(stock("b", "Billie")).await;

        let defaults = store.default_characters().await.unwrap();
        assert_eq!(defaults[0].id, "a");
        assert_eq!(defaults[1].id, "b");
    }

    #[tokio::test]
    async fn owned_characters_newest_first() {
        let store = MemStore::new();
        let mut first = stock("c1", "First");
        first.is_default = false;
        first.user_id = Some("user_1".into());
        let mut second = first.clone();
        second.id = "c2".into();
        second.name = "Second".into();
        second.created_at = first.created_at + chrono::Duration::seconds(5);

        store.upsert_owned_character(first).await.unwrap();
        store.upsert_owned_character(second).await.unwrap();

        let owned = store.owned_characters("user_1").await.unwrap();
        assert_eq!(owned[0].id, "c2");
        assert_eq!(owned[1].id, "c1");
    }

    #[tokio::test]
    async fn persona_activation_flips_previous() {
        let store = MemStore::new();
        let first = UserPersona::new("user_1", "Avery", "easygoing and curious", vec![]);
        let first_id = first.id.clone();
        store.set_active_persona(first).await.unwrap();
        store
            .set_active_persona(UserPersona::new("user_1", "Sam", "terse and focused", vec![]))
            .await
            .unwrap();

        let active = store.active_persona("user_1").await.unwrap().unwrap();
        assert_eq!(active.name, "Sam");

        // The old record survives, just inactive.
        let inner = store.inner.read().await;
        let old = inner.personas.iter().find(|p| p.id == first_id).unwrap();
        assert!(!old.is_active);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_read() {
        let store = MemStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.default_characters().await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_unavailable(false);
        assert!(store.default_characters().await.is_ok());
    }

    #[tokio::test]
    async fn hidden_markers_are_per_user() {
        let store = MemStore::new();
        store.set_hidden_default("user_1", "a").await.unwrap();

        assert_eq!(store.hidden_defaults("user_1").await.unwrap(), vec!["a"]);
        assert!(store.hidden_defaults("user_2").await.unwrap().is_empty());
    }
}
