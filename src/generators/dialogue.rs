//! Dialogue script generation.
//!
//! Lines are templated, not generative: speaker, emotion, text and delivery
//! are each picked by `line index % list length` from context- or role-keyed
//! tables, so the same inputs always produce the same script.

use crate::generators::table::{cycle, normalize_key, LookupTable};
use crate::generators::ActPosition;
use crate::project::model::{
    lead_character, Act, Character, DialogueLine, DialogueScene, DialogueScript, ParsedPrompt,
    StoryStructure,
};

/// Video types that always carry dialogue.
const DIALOGUE_VIDEO_TYPES: &[&str] = &["short_film", "commercial", "narrative"];
/// Genres that always carry dialogue.
const DIALOGUE_GENRES: &[&str] = &["drama", "comedy", "romance", "thriller"];

const WORDS_PER_LINE: f64 = 10.0;
const SECONDS_PER_WORD: f64 = 0.5;

static LINES_PER_SCENE: LookupTable<usize> = LookupTable::new(&[
    ("setup", 2),
    ("conflict", 3),
    ("climax", 4),
    ("resolution", 2),
    ("default", 2),
]);

static EMOTIONS: LookupTable<&[&str]> = LookupTable::new(&[
    ("setup", &["curious", "hopeful", "uneasy"]),
    ("conflict", &["frustrated", "defiant", "anxious"]),
    ("climax", &["determined", "furious", "desperate", "resolute"]),
    ("resolution", &["relieved", "reflective", "hopeful"]),
    ("default", &["neutral"]),
]);

static SENTENCES: LookupTable<&[&str]> = LookupTable::new(&[
    (
        "setup",
        &[
            "Something about {setting} feels different tonight.",
            "Have you heard the rumors about {element}?",
            "We can't stay here much longer.",
        ],
    ),
    (
        "conflict",
        &[
            "You knew about {element} all along.",
            "This isn't the way, {lead}, and you know it.",
            "If we do nothing, {setting} will fall.",
            "Stay out of my way.",
        ],
    ),
    (
        "climax",
        &[
            "It ends here, one way or another.",
            "Everything we fought for comes down to {element}.",
            "I won't let you take {setting}.",
            "Now! Before it's too late!",
        ],
    ),
    (
        "resolution",
        &[
            "It's over. For now.",
            "{setting} will remember what happened here.",
            "We should go home.",
        ],
    ),
    ("default", &["We need to talk about {element}."]),
]);

static DELIVERY_STYLES: LookupTable<&[&str]> = LookupTable::new(&[
    ("protagonist", &["earnest, steady", "urgent, determined", "quiet, resolute"]),
    ("antagonist", &["cold, measured", "menacing, deliberate", "mocking, controlled"]),
    ("mentor", &["calm, knowing", "gentle but firm"]),
    ("sidekick", &["quick, nervous", "wry, playful"]),
    ("default", &["natural", "conversational"]),
]);

static ACTION_NOTES: LookupTable<&[&str]> = LookupTable::new(&[
    (
        "setup",
        &[
            "Establish {setting} as {lead} enters.",
            "Hold on the environment before the first line.",
        ],
    ),
    ("conflict", &["Tension builds as the characters square off."]),
    (
        "climax",
        &[
            "The confrontation erupts; movement is fast and chaotic.",
            "Cut tight on faces at the peak.",
        ],
    ),
    (
        "resolution",
        &[
            "The dust settles over {setting}.",
            "{lead} lingers before parting.",
        ],
    ),
    ("default", &["Characters interact in {setting}."]),
]);

/// Builds the [`DialogueScript`] for a story.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueScriptGenerator;

impl DialogueScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates one dialogue scene per story scene, or an empty script when
    /// the project carries no dialogue.
    #[tracing::instrument(skip_all, fields(acts = story.acts.len(), characters = characters.len()))]
    pub fn generate(
        &self,
        prompt: &ParsedPrompt,
        story: &StoryStructure,
        characters: &[Character],
    ) -> DialogueScript {
        let id = format!("dialogue-{}", prompt.fingerprint().simple());
        if !self.needs_dialogue(prompt, characters) {
            tracing::debug!("No dialogue needed");
            return DialogueScript::empty(id);
        }

        let slots = Slots::new(prompt, characters);
        let act_count = story.acts.len();
        let scenes: Vec<DialogueScene> = story
            .acts
            .iter()
            .enumerate()
            .flat_map(|(i, act)| {
                let position = ActPosition::of(i, act_count);
                let participants = select_participants(position, characters);
                act.scene_ids
                    .iter()
                    .enumerate()
                    .map(|(k, scene_id)| {
                        self.build_scene(&slots, act, k, scene_id, position, &participants)
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let total_lines: usize = scenes.iter().map(|s| s.dialogue_lines.len()).sum();
        tracing::debug!(scenes = scenes.len(), total_lines, "Dialogue script generated");

        DialogueScript {
            id,
            scenes,
            total_lines: total_lines as u32,
            estimated_duration: total_lines as f64 * WORDS_PER_LINE * SECONDS_PER_WORD,
        }
    }

    /// True if the video type or genre is dialogue-bearing, or there is a cast.
    pub fn needs_dialogue(&self, prompt: &ParsedPrompt, characters: &[Character]) -> bool {
        let video_type = normalize_key(&prompt.video_type);
        let genre = normalize_key(&prompt.genre);
        DIALOGUE_VIDEO_TYPES.contains(&video_type.as_str())
            || DIALOGUE_GENRES.contains(&genre.as_str())
            || !characters.is_empty()
    }

    fn build_scene(
        &self,
        slots: &Slots<'_>,
        act: &Act,
        scene_index: usize,
        scene_id: &str,
        position: ActPosition,
        participants: &[&Character],
    ) -> DialogueScene {
        let context = position.scene_context();
        let line_count = if participants.is_empty() {
            0
        } else {
            *LINES_PER_SCENE.get(context)
        };

        let dialogue_lines = (0..line_count)
            .filter_map(|i| {
                let speaker = *cycle(participants, i)?;
                Some(build_line(slots, scene_id, context, i, speaker))
            })
            .collect();

        let mut action_notes: Vec<String> = ACTION_NOTES
            .get(context)
            .iter()
            .map(|note| slots.fill(note))
            .collect();
        if let Some(primary) = participants.first() {
            if let Some(gesture) = primary.gestures.first() {
                action_notes.push(format!("{} {}", primary.name, gesture));
            }
        }

        DialogueScene {
            scene_id: scene_id.to_string(),
            name: format!("{} - Scene {}", act.name, scene_index + 1),
            location: format!("{} - Location {}", slots.prompt.setting, act.number),
            time_of_day: position.time_label().to_string(),
            characters: participants.iter().map(|c| c.id.clone()).collect(),
            dialogue_lines,
            action_notes,
        }
    }
}

/// Opening act: the lead alone. Final act: up to three characters.
/// Otherwise up to two, lead and antagonist first.
fn select_participants(position: ActPosition, characters: &[Character]) -> Vec<&Character> {
    match position {
        ActPosition::Opening => lead_character(characters).into_iter().collect(),
        ActPosition::Final => characters.iter().take(3).collect(),
        ActPosition::Middle | ActPosition::Climax => {
            let mut selected: Vec<&Character> = lead_character(characters).into_iter().collect();
            if let Some(antagonist) = characters
                .iter()
                .find(|c| c.is_antagonist() && !selected.iter().any(|s| s.id == c.id))
            {
                selected.push(antagonist);
            }
            for character in characters {
                if selected.len() >= 2 {
                    break;
                }
                if !selected.iter().any(|s| s.id == character.id) {
                    selected.push(character);
                }
            }
            selected.truncate(2);
            selected
        }
    }
}

fn build_line(
    slots: &Slots<'_>,
    scene_id: &str,
    context: &str,
    index: usize,
    speaker: &Character,
) -> DialogueLine {
    let emotion = cycle(*EMOTIONS.get(context), index).copied().unwrap_or("neutral");
    let text = cycle(*SENTENCES.get(context), index)
        .map(|t| slots.fill(t))
        .unwrap_or_default();

    DialogueLine {
        id: format!("{}-line-{}", scene_id, index + 1),
        character_id: speaker.id.clone(),
        character_name: speaker.name.clone(),
        text,
        emotion: emotion.to_string(),
        delivery_notes: delivery_notes(speaker, index),
    }
}

/// Role-keyed tone, then any gesture, inflection and quirk the character has.
/// Every third line is prefixed with one of the character's onomatopoeia.
fn delivery_notes(speaker: &Character, index: usize) -> String {
    let mut notes = cycle(*DELIVERY_STYLES.get(speaker.role_key()), index)
        .copied()
        .unwrap_or("natural")
        .to_string();

    for extras in [
        &speaker.gestures,
        &speaker.voice_inflections,
        &speaker.diction_quirks,
    ] {
        if let Some(extra) = cycle(extras.as_slice(), index) {
            notes.push_str(", ");
            notes.push_str(extra);
        }
    }

    if (index + 1) % 3 == 0 {
        if let Some(token) = cycle(speaker.onomatopoeia.as_slice(), index) {
            notes = format!("[{}] {}", token, notes);
        }
    }
    notes
}

/// Values substituted into line and action-note templates.
struct Slots<'a> {
    prompt: &'a ParsedPrompt,
    setting: &'a str,
    element: &'a str,
    lead: &'a str,
}

impl<'a> Slots<'a> {
    fn new(prompt: &'a ParsedPrompt, characters: &'a [Character]) -> Self {
        let setting = if prompt.setting.trim().is_empty() {
            "this place"
        } else {
            prompt.setting.as_str()
        };
        Self {
            prompt,
            setting,
            element: prompt.first_key_element().unwrap_or("what happened"),
            lead: lead_character(characters).map_or("everyone", |c| c.name.as_str()),
        }
    }

    fn fill(&self, template: &str) -> String {
        template
            .replace("{setting}", self.setting)
            .replace("{element}", self.element)
            .replace("{lead}", self.lead)
    }
}
