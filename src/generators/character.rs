//! Cast generation.
//!
//! Like the world, the cast is produced by a swappable collaborator
//! ([`CharacterGenerator`]). [`BriefCharacterGenerator`] builds one
//! [`Character`] per brief in the prompt.

use std::collections::BTreeMap;

use crate::generators::table::LookupTable;
use crate::project::model::{Character, CharacterBrief, ParsedPrompt, WorldConfig};

/// Produces the fixed cast for a run.
pub trait CharacterGenerator: Send + Sync {
    fn generate(&self, prompt: &ParsedPrompt, world: &WorldConfig) -> Vec<Character>;
}

static ROLE_TRAITS: LookupTable<&[&str]> = LookupTable::new(&[
    ("protagonist", &["determined", "resourceful", "empathetic"]),
    ("antagonist", &["ambitious", "calculating", "ruthless"]),
    ("mentor", &["wise", "patient", "guarded"]),
    ("sidekick", &["loyal", "witty", "impulsive"]),
    ("default", &["curious", "observant"]),
]);

/// Builds characters from the prompt's character briefs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BriefCharacterGenerator;

impl BriefCharacterGenerator {
    pub fn new() -> Self {
        Self
    }

    fn build(&self, index: usize, brief: &CharacterBrief, world: &WorldConfig) -> Character {
        let number = index + 1;
        let name = if brief.name.trim().is_empty() {
            format!("Character {}", number)
        } else {
            brief.name.trim().to_string()
        };

        let role = normalize_role(index, &brief.role);
        let mut character = Character::new(format!("char-{}", number), name, role)
            .with_description(brief.description.clone())
            .with_gestures(brief.gestures.clone())
            .with_voice_inflections(brief.voice_inflections.clone())
            .with_diction_quirks(brief.diction_quirks.clone())
            .with_onomatopoeia(brief.onomatopoeia.clone());

        character.personality_traits = ROLE_TRAITS
            .get(character.role_key())
            .iter()
            .map(|t| t.to_string())
            .collect();
        character.visual_description = visual_description(&character, world);
        character
    }
}

impl CharacterGenerator for BriefCharacterGenerator {
    #[tracing::instrument(skip_all, fields(briefs = prompt.characters.len()))]
    fn generate(&self, prompt: &ParsedPrompt, world: &WorldConfig) -> Vec<Character> {
        let mut cast: Vec<Character> = prompt
            .characters
            .iter()
            .enumerate()
            .map(|(i, brief)| self.build(i, brief, world))
            .collect();

        let snapshot: Vec<(String, &'static str)> = cast
            .iter()
            .map(|c| (c.id.clone(), c.role_key()))
            .collect();
        for character in &mut cast {
            let own = character.role_key();
            character.relationships = snapshot
                .iter()
                .filter(|(id, _)| *id != character.id)
                .map(|(id, other)| (id.clone(), relationship_label(own, other).to_string()))
                .collect::<BTreeMap<_, _>>();
        }

        tracing::debug!(cast = cast.len(), "Cast generated");
        cast
    }
}

/// Lowercases the brief's role; empty roles are assigned by position.
fn normalize_role(index: usize, role: &str) -> String {
    let role = role.trim().to_lowercase();
    if !role.is_empty() {
        return role;
    }
    match index {
        0 => "protagonist",
        1 => "antagonist",
        _ => "supporting",
    }
    .to_string()
}

/// Label describing `other` from the point of view of `own`.
fn relationship_label(own: &str, other: &str) -> &'static str {
    match (own, other) {
        ("protagonist", "antagonist") | ("antagonist", "protagonist") => "rival",
        ("antagonist", _) | (_, "antagonist") => "adversary",
        (_, "mentor") => "mentor",
        ("mentor", _) => "student",
        ("sidekick", _) | (_, "sidekick") => "companion",
        _ => "ally",
    }
}

fn visual_description(character: &Character, world: &WorldConfig) -> String {
    let base = if character.description.trim().is_empty() {
        format!("{}, {}", character.name, character.role)
    } else {
        character.description.trim().to_string()
    };
    let mut description = format!("{}, {} style", base, world.primary_style());
    if !world.time_period.trim().is_empty() {
        description.push_str(&format!(", {} attire", world.time_period.trim()));
    }
    description
}
