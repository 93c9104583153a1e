//! Scripted generation backend for tests and demos.
//!
//! Maps character names to canned outcomes, with optional artificial
//! latency so timing behavior can be exercised under a paused clock. Every
//! request is recorded for later inspection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use ensemble_core::error::GenerationError;
use ensemble_core::generate::{GenerationReply, GenerationRequest, Generator};

struct Script {
    outcome: Result<GenerationReply, GenerationError>,
    latency: Duration,
}

/// A generation backend that answers from a per-character script.
///
/// The character is identified by the identity line at the top of the
/// assembled context. Panics on an unscripted character — a test that asks
/// for one has a bug.
#[derive(Default)]
pub struct ScriptedGenerator {
    scripts: HashMap<String, Script>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful reply for a character.
    pub fn script(mut self, name: &str, reply: GenerationReply) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                outcome: Ok(reply),
                latency: Duration::ZERO,
            },
        );
        self
    }

    /// Script a successful reply delivered after an artificial delay.
    pub fn script_with_latency(
        mut self,
        name: &str,
        reply: GenerationReply,
        latency: Duration,
    ) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                outcome: Ok(reply),
                latency,
            },
        );
        self
    }

    /// Script a failure for a character.
    pub fn script_failure(mut self, name: &str, reason: &str) -> Self {
        self.scripts.insert(
            name.to_string(),
            Script {
                outcome: Err(GenerationError::Failed(reason.to_string())),
                latency: Duration::ZERO,
            },
        );
        self
    }

    /// Every request seen so far, in call order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// How many generation calls were made.
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("request log poisoned").len()
    }

    /// Pull the character name out of the context's identity line
    /// (`"You are {name}, ..."`).
    fn character_name(context: &str) -> Option<&str> {
        let rest = context.strip_prefix("You are ")?;
        rest.split(',').next()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationReply, GenerationError> {
        let name = Self::character_name(&request.context)
            .unwrap_or("<unknown>")
            .to_string();
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);

        let script = self
            .scripts
            .get(&name)
            .unwrap_or_else(|| panic!("ScriptedGenerator: no script for character '{name}'"));

        if script.latency > Duration::ZERO {
            tokio::time::sleep(script.latency).await;
        }
        script.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_core::generate::ModelConfig;

    fn request_for(context: &str) -> GenerationRequest {
        GenerationRequest {
            context: context.into(),
            user_message: "hi".into(),
            config: ModelConfig {
                temperature: 0.8,
                max_tokens: 300,
                context_window: 8000,
            },
        }
    }

    #[tokio::test]
    async fn scripted_reply_matched_by_identity_line() {
        let generator = ScriptedGenerator::new()
            .script("Zoe", GenerationReply::text("Obviously.").with_mood("smug", 0.7));

        let reply = generator
            .generate(request_for("You are Zoe, a 24-year-old female."))
            .await
            .unwrap();
        assert_eq!(reply.content, "Obviously.");
        assert_eq!(reply.mood, "smug");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn scripted_failure_surfaces_as_error() {
        let generator = ScriptedGenerator::new().script_failure("Zoe", "backend exploded");
        let err = generator
            .generate(request_for("You are Zoe, a 24-year-old female."))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Failed(_)));
    }
}
