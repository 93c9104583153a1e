//! # Ensemble Engine
//!
//! The exposed boundary of the ensemble character chat engine:
//!
//! - [`TurnScheduler::submit_turn`] — one user message in, an ordered,
//!   pacing-staggered set of character responses out
//! - [`TurnScheduler::cancel_batch`] — discard a session's in-flight batch
//! - [`Roster::resolve_for_editing`] — edit a character, copy-on-write for
//!   stock entries (reachable via [`TurnScheduler::roster`])
//! - [`validate_character`] / [`validate_scene`] — the validation gate
//!
//! Storage and generation are collaborator traits from `ensemble-core`;
//! wire in any backends and the engine does the rest.

pub mod mock;
pub mod pacing;
pub mod scheduler;

pub use pacing::{FixedPacing, Pacing, StaggeredPacing};
pub use scheduler::TurnScheduler;

// Re-export the rest of the boundary so embedders need only this crate.
pub use ensemble_config::EngineConfig;
pub use ensemble_core::error::{Error, Result, TurnError};
pub use ensemble_core::event::{DomainEvent, EventBus};
pub use ensemble_core::generate::{GenerationReply, GenerationRequest, Generator};
pub use ensemble_core::store::RecordStore;
pub use ensemble_core::turn::{CharacterResponse, ChatTurn, TurnRequest};
pub use ensemble_roster::{DeleteOutcome, ResolvedCharacter, Roster};
pub use ensemble_validate::{validate_character, validate_scene};
