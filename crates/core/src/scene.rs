//! Scene — the shared stage a conversation plays out on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field length limits, in characters.
pub const NAME_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 200;
pub const CONTEXT_MAX_LEN: usize = 300;
pub const ATMOSPHERE_MAX_LEN: usize = 100;

/// A scene: name, description, narrative instructions, and mood.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Unique scene ID
    pub id: String,

    /// Display name (≤ 50 chars)
    pub name: String,

    /// What the scene looks like (≤ 200 chars)
    pub description: String,

    /// Narrative instructions for the characters (≤ 300 chars)
    pub context: String,

    /// Free-text mood tag (≤ 100 chars)
    #[serde(default = "default_atmosphere")]
    pub atmosphere: String,

    /// Optional background image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

fn default_atmosphere() -> String {
    "neutral".into()
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            context: context.into(),
            atmosphere: default_atmosphere(),
            background_image: None,
        }
    }

    pub fn with_atmosphere(mut self, atmosphere: impl Into<String>) -> Self {
        self.atmosphere = atmosphere.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atmosphere_defaults_to_neutral() {
        let scene = Scene::new("Coffee Shop", "A cozy corner café", "You are all regulars here.");
        assert_eq!(scene.atmosphere, "neutral");

        // Also when deserializing a record without the field
        let json = r#"{"id":"s1","name":"Park","description":"Open green","context":"Sunday stroll"}"#;
        let parsed: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.atmosphere, "neutral");
    }

    #[test]
    fn with_atmosphere_overrides_default() {
        let scene = Scene::new("Coffee Shop", "A cozy corner café", "You are all regulars here.")
            .with_atmosphere("relaxed and friendly");
        assert_eq!(scene.atmosphere, "relaxed and friendly");
    }
}
