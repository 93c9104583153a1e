//! Error types for the ensemble domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. The propagation policy:
//! validation and lookup errors surface at the operation boundary,
//! generation errors are recovered per character, store errors abort the
//! whole turn.

use thiserror::Error;

/// The top-level error type for all ensemble operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Validation errors ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Lookup errors ---
    #[error("Not found: {0}")]
    NotFound(String),

    // --- Record store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Turn lifecycle errors ---
    #[error("Turn error: {0}")]
    Turn(#[from] TurnError),

    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// One or more field-level failures, all reported together.
///
/// The gate never short-circuits: a submission violating three rules
/// produces three entries, in check order.
#[derive(Debug, Clone, Error)]
#[error("validation failed: {}", .errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

impl ValidationError {
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum TurnError {
    #[error("A turn is already in flight for session {session_id}")]
    ConflictInFlight { session_id: String },

    #[error("No active characters in turn request")]
    NoActiveCharacters,

    #[error("Turn cancelled for session {session_id}")]
    Cancelled { session_id: String },
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generation failed: {0}")]
    Failed(String),

    #[error("Generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Generation backend unavailable: {0}")]
    Unavailable(String),
}
