//! Validation gate — structural invariants on character and scene data.
//!
//! Every submission passes through here before it reaches the roster or the
//! scheduler. All checks are evaluated, never short-circuited, so the caller
//! receives the complete error list in one pass and can surface every field
//! problem at once.

use ensemble_core::character::{
    self, CharacterDraft, MAX_TOKENS_MAX, MAX_TOKENS_MIN, MIN_AGE, PERSONALITY_MAX_LEN,
    PERSONALITY_MIN_LEN, TEMPERATURE_MAX, TEMPERATURE_MIN,
};
use ensemble_core::error::ValidationError;
use ensemble_core::scene::{
    ATMOSPHERE_MAX_LEN, CONTEXT_MAX_LEN, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, Scene,
};

/// Validate a character submission.
///
/// Required: name, age (≥ 18), personality (20–1000 chars). The behavioral
/// knobs are optional but range-checked when present.
pub fn validate_character(draft: &CharacterDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    match &draft.name {
        Some(name) if !name.trim().is_empty() => {}
        _ => errors.push("name must not be empty".to_string()),
    }

    match draft.age {
        Some(age) if age >= MIN_AGE => {}
        Some(age) => errors.push(format!("age must be at least {MIN_AGE}, got {age}")),
        None => errors.push(format!("age is required and must be at least {MIN_AGE}")),
    }

    match &draft.personality {
        Some(p) if p.trim().is_empty() => {
            errors.push("personality must not be empty".to_string());
        }
        Some(p) if p.chars().count() < PERSONALITY_MIN_LEN => {
            errors.push(format!(
                "personality must be at least {PERSONALITY_MIN_LEN} characters"
            ));
        }
        Some(p) if p.chars().count() > PERSONALITY_MAX_LEN => {
            errors.push(format!(
                "personality must be at most {PERSONALITY_MAX_LEN} characters"
            ));
        }
        Some(_) => {}
        None => errors.push("personality is required".to_string()),
    }

    if let Some(temperature) = draft.temperature {
        if !(TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&temperature) {
            errors.push(format!(
                "temperature must be between {TEMPERATURE_MIN} and {TEMPERATURE_MAX}"
            ));
        }
    }

    if let Some(max_tokens) = draft.max_tokens {
        if !(MAX_TOKENS_MIN..=MAX_TOKENS_MAX).contains(&max_tokens) {
            errors.push(format!(
                "max_tokens must be between {MAX_TOKENS_MIN} and {MAX_TOKENS_MAX}"
            ));
        }
    }

    if let Some(context_window) = draft.context_window {
        if !(character::CONTEXT_WINDOW_MIN..=character::CONTEXT_WINDOW_MAX)
            .contains(&context_window)
        {
            errors.push(format!(
                "context_window must be between {} and {}",
                character::CONTEXT_WINDOW_MIN,
                character::CONTEXT_WINDOW_MAX
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}

/// Validate a scene.
///
/// Name, description and context are required; atmosphere is optional
/// (its serde default is `"neutral"`) but length-checked.
pub fn validate_scene(scene: &Scene) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if scene.name.trim().is_empty() {
        errors.push("name must not be empty".to_string());
    } else if scene.name.chars().count() > NAME_MAX_LEN {
        errors.push(format!("name must be at most {NAME_MAX_LEN} characters"));
    }

    if scene.description.trim().is_empty() {
        errors.push("description must not be empty".to_string());
    } else if scene.description.chars().count() > DESCRIPTION_MAX_LEN {
        errors.push(format!(
            "description must be at most {DESCRIPTION_MAX_LEN} characters"
        ));
    }

    if scene.context.trim().is_empty() {
        errors.push("context must not be empty".to_string());
    } else if scene.context.chars().count() > CONTEXT_MAX_LEN {
        errors.push(format!(
            "context must be at most {CONTEXT_MAX_LEN} characters"
        ));
    }

    if scene.atmosphere.chars().count() > ATMOSPHERE_MAX_LEN {
        errors.push(format!(
            "atmosphere must be at most {ATMOSPHERE_MAX_LEN} characters"
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(errors))
    }
}
