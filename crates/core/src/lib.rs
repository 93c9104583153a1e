//! # Ensemble Core
//!
//! Domain types, traits, and error definitions for the ensemble character
//! chat engine. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators — the record store and the generation
//! backend — are defined as traits here. Implementations live in their
//! respective crates (or outside this repository entirely). This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod character;
pub mod error;
pub mod event;
pub mod generate;
pub mod memory;
pub mod persona;
pub mod relationship;
pub mod scene;
pub mod store;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use character::{Avatar, CharacterDraft, CharacterLink, CharacterRecord, ChatExample};
pub use error::{Error, GenerationError, Result, StoreError, TurnError, ValidationError};
pub use event::{DomainEvent, EventBus};
pub use generate::{GenerationReply, GenerationRequest, Generator, ModelConfig};
pub use memory::MemoryEntry;
pub use persona::UserPersona;
pub use relationship::RelationshipState;
pub use scene::Scene;
pub use store::RecordStore;
pub use turn::{CharacterResponse, ChatTurn, PeerMessage, TurnRequest};
