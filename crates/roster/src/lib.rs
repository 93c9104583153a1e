//! Identity resolution — which characters a user sees, and what editing
//! them means.
//!
//! The catalog of stock characters is shared and immutable. A user never
//! edits a stock entry in place: the first edit copies it into an owned
//! *override* record (`original_id` pointing back at the stock entry) and
//! drops a hidden-default marker so the stock entry vanishes from that
//! user's visible set. Later edits land on the override. Deleting a stock
//! entry only hides it for that user; deleting an owned record removes it.
//!
//! All visibility rules live here, computed from three primitive store
//! reads — backends stay free of shadowing logic.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use ensemble_core::character::{CharacterDraft, CharacterRecord};
use ensemble_core::error::{Error, Result};
use ensemble_core::event::{DomainEvent, EventBus};
use ensemble_core::store::RecordStore;
use ensemble_validate::validate_character;

/// A character reference resolved for one user.
///
/// Stock entries are shared; owned records belong to the resolving user.
/// Carrying the distinction (instead of a bare record) keeps the
/// copy-on-write decision at the type level.
#[derive(Debug, Clone)]
pub enum ResolvedCharacter {
    /// A stock catalog entry, visible and unmodified for this user.
    Default(CharacterRecord),
    /// A record the user owns (possibly an override of a stock entry).
    Owned(CharacterRecord),
}

impl ResolvedCharacter {
    pub fn record(&self) -> &CharacterRecord {
        match self {
            Self::Default(record) | Self::Owned(record) => record,
        }
    }

    pub fn into_record(self) -> CharacterRecord {
        match self {
            Self::Default(record) | Self::Owned(record) => record,
        }
    }
}

/// What `delete` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A stock entry was hidden for this user; the catalog is untouched.
    Hidden,
    /// An owned record was removed.
    Deleted,
}

/// The identity resolver.
pub struct Roster {
    store: Arc<dyn RecordStore>,
    events: Arc<EventBus>,
    /// Serialises the copy-on-write path: two concurrent edits of the same
    /// default by one user must not create two overrides.
    edit_lock: Mutex<()>,
}

impl Roster {
    pub fn new(store: Arc<dyn RecordStore>, events: Arc<EventBus>) -> Self {
        Self {
            store,
            events,
            edit_lock: Mutex::new(()),
        }
    }

    /// The characters visible to a user: their owned records
    /// (most-recently-created first), then the stock catalog minus hidden
    /// entries, in catalog order. No duplicate IDs.
    pub async fn list_visible(&self, user_id: &str) -> Result<Vec<CharacterRecord>> {
        let mut visible = self.store.owned_characters(user_id).await?;
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let hidden: HashSet<String> =
            self.store.hidden_defaults(user_id).await?.into_iter().collect();
        let mut seen: HashSet<String> = visible.iter().map(|c| c.id.clone()).collect();

        for stock in self.store.default_characters().await? {
            if hidden.contains(&stock.id) || !seen.insert(stock.id.clone()) {
                continue;
            }
            visible.push(stock);
        }

        Ok(visible)
    }

    /// Resolve a character reference for a user: their owned record first,
    /// else a stock entry they have not hidden. A reference to a shadowed
    /// stock entry lands on its override.
    pub async fn resolve(&self, user_id: &str, character_id: &str) -> Result<ResolvedCharacter> {
        if let Some(record) = self.store.owned_character(user_id, character_id).await? {
            return Ok(ResolvedCharacter::Owned(record));
        }

        if let Some(record) = self
            .store
            .owned_characters(user_id)
            .await?
            .into_iter()
            .find(|c| c.original_id.as_deref() == Some(character_id))
        {
            return Ok(ResolvedCharacter::Owned(record));
        }

        let hidden = self.store.hidden_defaults(user_id).await?;
        if !hidden.iter().any(|id| id == character_id) {
            if let Some(stock) = self
                .store
                .default_characters()
                .await?
                .into_iter()
                .find(|c| c.id == character_id)
            {
                return Ok(ResolvedCharacter::Default(stock));
            }
        }

        Err(Error::NotFound(format!(
            "character {character_id} is not visible to user {user_id}"
        )))
    }

    /// Apply edits to a character, copying a stock entry on first write.
    ///
    /// - Owned target: merge the draft into the record in place.
    /// - Stock target with an existing override: the edit lands on the
    ///   override — never a second copy.
    /// - Stock target, first edit: create an override seeded from the stock
    ///   entry (omitted draft fields inherit its values), hide the stock
    ///   entry for this user, return the new record.
    ///
    /// The merged result passes the validation gate before anything is
    /// written. The stock catalog is never mutated.
    pub async fn resolve_for_editing(
        &self,
        user_id: &str,
        character_id: &str,
        draft: &CharacterDraft,
    ) -> Result<CharacterRecord> {
        let _guard = self.edit_lock.lock().await;

        // Owned record: edit in place.
        if let Some(existing) = self.store.owned_character(user_id, character_id).await? {
            let merged = draft.apply_to(&existing);
            validate_character(&CharacterDraft::from(&merged))?;
            self.store.upsert_owned_character(merged.clone()).await?;
            debug!(user_id, character_id, "Edited owned character");
            return Ok(merged);
        }

        // Stock target already overridden: the edit lands on the override.
        if let Some(existing_override) = self
            .store
            .owned_characters(user_id)
            .await?
            .into_iter()
            .find(|c| c.original_id.as_deref() == Some(character_id))
        {
            let merged = draft.apply_to(&existing_override);
            validate_character(&CharacterDraft::from(&merged))?;
            self.store.upsert_owned_character(merged.clone()).await?;
            debug!(
                user_id,
                character_id,
                override_id = %merged.id,
                "Edited existing override of stock character"
            );
            return Ok(merged);
        }

        // Stock target, visible: copy-on-write.
        let hidden = self.store.hidden_defaults(user_id).await?;
        let stock = if hidden.iter().any(|id| id == character_id) {
            None
        } else {
            self.store
                .default_characters()
                .await?
                .into_iter()
                .find(|c| c.id == character_id)
        };
        let stock = stock.ok_or_else(|| {
            Error::NotFound(format!(
                "character {character_id} is not visible to user {user_id}"
            ))
        })?;

        let record = draft.to_override(&stock, user_id);
        validate_character(&CharacterDraft::from(&record))?;

        self.store.upsert_owned_character(record.clone()).await?;
        self.store.set_hidden_default(user_id, character_id).await?;

        info!(
            user_id,
            original_id = character_id,
            override_id = %record.id,
            "Stock character shadowed by user override"
        );
        self.events.publish(DomainEvent::CharacterShadowed {
            user_id: user_id.to_string(),
            original_id: character_id.to_string(),
            override_id: record.id.clone(),
            timestamp: chrono::Utc::now(),
        });

        Ok(record)
    }

    /// Delete a character from the user's roster.
    ///
    /// Stock entries are shared catalog state: deletion only drops a hidden
    /// marker for this user. Owned records are actually removed.
    pub async fn delete(&self, user_id: &str, character_id: &str) -> Result<DeleteOutcome> {
        let _guard = self.edit_lock.lock().await;

        if self
            .store
            .remove_owned_character(user_id, character_id)
            .await?
        {
            debug!(user_id, character_id, "Deleted owned character");
            return Ok(DeleteOutcome::Deleted);
        }

        let is_default = self
            .store
            .default_characters()
            .await?
            .iter()
            .any(|c| c.id == character_id);
        if is_default {
            self.store.set_hidden_default(user_id, character_id).await?;
            debug!(user_id, character_id, "Hid stock character");
            return Ok(DeleteOutcome::Hidden);
        }

        Err(Error::NotFound(format!(
            "character {character_id} is not visible to user {user_id}"
        )))
    }
}
