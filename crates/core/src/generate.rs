//! Generator trait — the abstraction over the generation collaborator.
//!
//! A Generator turns one assembled context plus the user's message into one
//! character response. The engine never knows which backend is behind the
//! trait — a hosted LLM, a local model, or a scripted mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Behavioral knobs taken from the character record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Sampling temperature ∈ [0, 2]
    pub temperature: f32,

    /// Response length cap ∈ [50, 1000]
    pub max_tokens: u32,

    /// Context window ∈ [1000, 32000]
    pub context_window: u32,
}

/// One generation call: context → text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The assembled instruction text for this character
    pub context: String,

    /// The user message being responded to
    pub user_message: String,

    /// Per-character model configuration
    pub config: ModelConfig,
}

/// What the generation collaborator returns for one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReply {
    /// The response text
    pub content: String,

    /// Mood label supplied alongside the text
    pub mood: String,

    /// Mood intensity ∈ [0, 1]
    pub mood_intensity: f32,
}

impl GenerationReply {
    /// A reply with neutral mood — mocks and fallbacks start here.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mood: "neutral".into(),
            mood_intensity: 0.0,
        }
    }

    pub fn with_mood(mut self, mood: impl Into<String>, intensity: f32) -> Self {
        self.mood = mood.into();
        self.mood_intensity = intensity;
        self
    }
}

/// The generation collaborator.
///
/// One operation: `generate`. Failures are per-character; the scheduler
/// recovers them locally and never lets one slot fail the batch.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable backend name (e.g. "anthropic", "mock").
    fn name(&self) -> &str;

    /// Produce one character response for an assembled context.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationReply, GenerationError>;
}
