//! Context assembly — the prompt construction contract.
//!
//! Builds the instruction text sent to the generation collaborator for one
//! character on one turn. The assembly is a pure function: identical inputs
//! always yield byte-identical output, which is what makes the generation
//! collaborator mockable and the sections cacheable.
//!
//! The format is an ordered list of independently-computable, optional
//! sections. Each section is a plain function of a narrow slice of the
//! input; a section whose source data is absent or empty returns `None` and
//! is skipped entirely — an empty header is never emitted. The `SECTIONS`
//! slice is the single source of truth for section order.

use ensemble_core::character::CharacterRecord;
use ensemble_core::memory::MemoryEntry;
use ensemble_core::persona::UserPersona;
use ensemble_core::relationship::RelationshipState;
use ensemble_core::scene::Scene;
use ensemble_core::turn::PeerMessage;

/// Everything a single character's context is assembled from.
///
/// Borrowed: assembly never mutates or stores its inputs.
pub struct ContextInput<'a> {
    /// The resolved character speaking.
    pub character: &'a CharacterRecord,
    /// The user's active persona, if any.
    pub persona: Option<&'a UserPersona>,
    /// Relationship state between the user and this character.
    pub relationship: Option<&'a RelationshipState>,
    /// Remembered facts, already ordered by the caller (most important
    /// first).
    pub memories: &'a [MemoryEntry],
    /// The scene the conversation plays out on.
    pub scene: Option<&'a Scene>,
    /// Recent messages by other characters, oldest first.
    pub peer_messages: &'a [PeerMessage],
}

/// The context assembler. Stateless apart from its windowing limits —
/// create one and reuse it.
pub struct ContextAssembler {
    /// Peer messages cited per context (most recent N).
    peer_window: usize,
    /// Maximum remembered facts rendered.
    memory_limit: usize,
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self {
            peer_window: 3,
            memory_limit: 25,
        }
    }
}

/// Section order — the single source of truth for the output format.
const SECTIONS: &[fn(&ContextInput<'_>) -> Option<String>] = &[
    identity_line,
    appearance,
    personality,
    background,
    scene_setting,
    persona_awareness,
    declared_relationships,
    chat_examples,
    remembered_facts,
    relationship_metrics,
    peer_awareness,
    closing_instruction,
];

impl ContextAssembler {
    pub fn new(peer_window: usize, memory_limit: usize) -> Self {
        Self {
            peer_window,
            memory_limit,
        }
    }

    /// Assemble the instruction text for one character.
    pub fn build(&self, input: &ContextInput<'_>) -> String {
        // Apply the windowing limits up front so every section renderer
        // stays a pure function of what it sees.
        let memories = &input.memories[..input.memories.len().min(self.memory_limit)];
        let peer_start = input.peer_messages.len().saturating_sub(self.peer_window);
        let windowed = ContextInput {
            character: input.character,
            persona: input.persona,
            relationship: input.relationship,
            memories,
            scene: input.scene,
            peer_messages: &input.peer_messages[peer_start..],
        };

        let sections: Vec<String> = SECTIONS.iter().filter_map(|f| f(&windowed)).collect();
        sections.join("\n\n")
    }
}

// ── Section renderers ─────────────────────────────────────────────────────

fn identity_line(input: &ContextInput<'_>) -> Option<String> {
    let c = input.character;
    Some(format!("You are {}, a {}-year-old {}.", c.name, c.age, c.sex))
}

fn appearance(input: &ContextInput<'_>) -> Option<String> {
    let text = input.character.appearance.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(format!("Appearance: {text}"))
}

fn personality(input: &ContextInput<'_>) -> Option<String> {
    Some(format!("Personality: {}", input.character.personality))
}

fn background(input: &ContextInput<'_>) -> Option<String> {
    let text = input.character.background.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(format!("Background: {text}"))
}

fn scene_setting(input: &ContextInput<'_>) -> Option<String> {
    let scene = input.scene?;
    let mut out = format!("Current scene: {}. {}", scene.name, scene.description);
    if !scene.context.trim().is_empty() {
        out.push_str(&format!("\nScene direction: {}", scene.context));
    }
    if !scene.atmosphere.trim().is_empty() {
        out.push_str(&format!("\nAtmosphere: {}", scene.atmosphere));
    }
    Some(out)
}

fn persona_awareness(input: &ContextInput<'_>) -> Option<String> {
    let persona = input.persona?;
    let mut out = format!("You are talking with {}. {}", persona.name, persona.personality);
    if !persona.interests.is_empty() {
        out.push_str(&format!("\nTheir interests: {}.", persona.interests.join(", ")));
    }
    Some(out)
}

fn declared_relationships(input: &ContextInput<'_>) -> Option<String> {
    let links = &input.character.relationships;
    if links.is_empty() {
        return None;
    }
    let mut out = String::from("Your relationships:");
    for link in links {
        out.push_str(&format!("\n- {}: {}", link.target_name, link.description));
    }
    Some(out)
}

fn chat_examples(input: &ContextInput<'_>) -> Option<String> {
    let examples = &input.character.chat_examples;
    if examples.is_empty() {
        return None;
    }
    let mut out = String::from("Example exchanges:");
    for example in examples {
        out.push_str(&format!(
            "\nUser: {}\n{}: {}",
            example.user, input.character.name, example.character
        ));
    }
    Some(out)
}

fn remembered_facts(input: &ContextInput<'_>) -> Option<String> {
    if input.memories.is_empty() {
        return None;
    }
    let mut out = String::from("Things you remember about the user:");
    for entry in input.memories {
        out.push_str(&format!("\n- {}", entry.content));
    }
    Some(out)
}

fn relationship_metrics(input: &ContextInput<'_>) -> Option<String> {
    let state = input.relationship?;
    Some(format!(
        "Your relationship with the user: {} (familiarity {}%, trust {}%).",
        state.relationship_type,
        percent(state.familiarity),
        percent(state.trust)
    ))
}

fn peer_awareness(input: &ContextInput<'_>) -> Option<String> {
    if input.peer_messages.is_empty() {
        return None;
    }
    let mut out = String::from("Other characters have just spoken:");
    for peer in input.peer_messages {
        out.push_str(&format!("\n{}: {}", peer.character_name, peer.content));
    }
    out.push_str("\nYou may react to or reference what they said.");
    Some(out)
}

fn closing_instruction(input: &ContextInput<'_>) -> Option<String> {
    Some(format!(
        "Stay in character as {}. Respond based on your personality, background, and the current context.",
        input.character.name
    ))
}

/// Render a unit-interval value as an integer percentage.
///
/// The only numeric transformation in the whole assembly.
fn percent(value: f32) -> i32 {
    (value * 100.0).round() as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────
