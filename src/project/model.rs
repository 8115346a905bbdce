//! Data models for the project generation pipeline.
//!
//! Every artifact derives serde for JSON hand-off and the autosurgeon
//! `Reconcile`/`Hydrate` pair so a generated project can live in a
//! [`super::ProjectDocument`].

use autosurgeon::{Hydrate, Reconcile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{GenError, GenResult};
use crate::pipeline::coherence::CoherenceReport;

// =============================================================================
// PARSED PROMPT
// =============================================================================

/// The structured creative brief that seeds the pipeline.
///
/// Ordered lists (`mood`, `key_elements`, `visual_style`) keep the user's
/// order; generators pick "the first N" entries from them.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParsedPrompt {
    pub title: String,
    pub genre: String,
    /// "trailer" | "teaser" | "short_film" | "music_video" | "commercial" | ...
    pub video_type: String,
    pub duration_seconds: u32,
    pub mood: Vec<String>,
    pub setting: String,
    pub time_period: String,
    pub characters: Vec<CharacterBrief>,
    pub key_elements: Vec<String>,
    pub visual_style: Vec<String>,
    /// "W:H", e.g. "16:9"
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// Original free text the prompt was parsed from
    pub raw_text: String,
    /// Parser confidence per field (0.0 - 1.0)
    pub confidence_scores: BTreeMap<String, f64>,
}

/// Longest project the pipeline accepts (four hours).
pub const MAX_DURATION_SECONDS: u32 = 4 * 60 * 60;

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl ParsedPrompt {
    /// Creates a prompt with the required fields and a 16:9 aspect ratio.
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        video_type: impl Into<String>,
        duration_seconds: u32,
    ) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            video_type: video_type.into(),
            duration_seconds,
            aspect_ratio: default_aspect_ratio(),
            ..Default::default()
        }
    }

    /// Builder: Append a mood term.
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood.push(mood.into());
        self
    }

    /// Builder: Set setting.
    pub fn with_setting(mut self, setting: impl Into<String>) -> Self {
        self.setting = setting.into();
        self
    }

    /// Builder: Set time period.
    pub fn with_time_period(mut self, time_period: impl Into<String>) -> Self {
        self.time_period = time_period.into();
        self
    }

    /// Builder: Add a character brief.
    pub fn with_character(mut self, brief: CharacterBrief) -> Self {
        self.characters.push(brief);
        self
    }

    /// Builder: Append a key element.
    pub fn with_key_element(mut self, element: impl Into<String>) -> Self {
        self.key_elements.push(element.into());
        self
    }

    /// Builder: Append a visual style term.
    pub fn with_visual_style(mut self, style: impl Into<String>) -> Self {
        self.visual_style.push(style.into());
        self
    }

    /// Builder: Set aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    /// Builder: Set raw text.
    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    /// Builder: Set a confidence score.
    pub fn with_confidence(mut self, field: impl Into<String>, score: f64) -> Self {
        self.confidence_scores.insert(field.into(), score);
        self
    }

    /// First mood term, if any.
    pub fn first_mood(&self) -> Option<&str> {
        self.mood.first().map(String::as_str)
    }

    /// First key element, if any.
    pub fn first_key_element(&self) -> Option<&str> {
        self.key_elements.first().map(String::as_str)
    }

    /// Rejects prompts the pipeline cannot start from.
    pub fn validate(&self) -> GenResult<()> {
        if self.title.trim().is_empty() {
            return Err(GenError::invalid_prompt("title", "must not be empty"));
        }
        if self.genre.trim().is_empty() {
            return Err(GenError::invalid_prompt("genre", "must not be empty"));
        }
        if self.video_type.trim().is_empty() {
            return Err(GenError::invalid_prompt("video_type", "must not be empty"));
        }
        if self.duration_seconds == 0 {
            return Err(GenError::invalid_prompt(
                "duration_seconds",
                "must be a positive number of seconds",
            ));
        }
        if self.duration_seconds > MAX_DURATION_SECONDS {
            return Err(GenError::invalid_prompt(
                "duration_seconds",
                format!("must be at most {} seconds", MAX_DURATION_SECONDS),
            ));
        }
        if !is_valid_aspect_ratio(&self.aspect_ratio) {
            return Err(GenError::invalid_prompt(
                "aspect_ratio",
                format!("expected W:H, got {:?}", self.aspect_ratio),
            ));
        }
        for (field, score) in &self.confidence_scores {
            if !(0.0..=1.0).contains(score) {
                return Err(GenError::invalid_prompt(
                    "confidence_scores",
                    format!("score for {} out of range: {}", field, score),
                ));
            }
        }
        Ok(())
    }

    /// Name-based UUID over the prompt's JSON form.
    ///
    /// Identical prompts always produce the same fingerprint, so ids derived
    /// from it are stable across runs.
    pub fn fingerprint(&self) -> Uuid {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes)
    }
}

fn is_valid_aspect_ratio(value: &str) -> bool {
    let mut parts = value.split(':');
    let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    matches!(
        (w.trim().parse::<f64>(), h.trim().parse::<f64>()),
        (Ok(w), Ok(h)) if w > 0.0 && h > 0.0
    )
}

/// A character as described in the brief, before the cast is generated.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CharacterBrief {
    pub name: String,
    /// Free-text role; may be empty
    pub role: String,
    pub description: String,
    pub gestures: Vec<String>,
    pub voice_inflections: Vec<String>,
    pub diction_quirks: Vec<String>,
    pub onomatopoeia: Vec<String>,
}

impl CharacterBrief {
    /// Creates a brief with the given name and role.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Append a gesture.
    pub fn with_gesture(mut self, gesture: impl Into<String>) -> Self {
        self.gestures.push(gesture.into());
        self
    }

    /// Builder: Append a voice inflection.
    pub fn with_voice_inflection(mut self, inflection: impl Into<String>) -> Self {
        self.voice_inflections.push(inflection.into());
        self
    }

    /// Builder: Append a diction quirk.
    pub fn with_diction_quirk(mut self, quirk: impl Into<String>) -> Self {
        self.diction_quirks.push(quirk.into());
        self
    }

    /// Builder: Append an onomatopoeia token.
    pub fn with_onomatopoeia(mut self, token: impl Into<String>) -> Self {
        self.onomatopoeia.push(token.into());
        self
    }
}

// =============================================================================
// WORLD
// =============================================================================

/// Visual and atmospheric rules of the project's world.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub genre: String,
    pub setting: String,
    pub time_period: String,
    pub visual_style: Vec<String>,
    pub color_palette: Vec<String>,
    pub lighting_style: String,
    pub atmosphere: String,
    pub key_locations: Vec<String>,
}

impl WorldConfig {
    /// Primary visual style term, or "cinematic".
    pub fn primary_style(&self) -> &str {
        self.visual_style
            .first()
            .map(String::as_str)
            .unwrap_or("cinematic")
    }
}

// =============================================================================
// CHARACTER
// =============================================================================

/// A cast member. `id` is the foreign key used by dialogue data.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// protagonist | antagonist | mentor | sidekick | other free text
    pub role: String,
    pub description: String,
    pub visual_description: String,
    pub personality_traits: Vec<String>,
    /// Other character id -> relationship label
    pub relationships: BTreeMap<String, String>,

    /// Optional performance capabilities (empty = not present)
    pub gestures: Vec<String>,
    pub voice_inflections: Vec<String>,
    pub diction_quirks: Vec<String>,
    pub onomatopoeia: Vec<String>,
}

impl Character {
    /// Creates a new Character with the given ID, name and role.
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set gestures.
    pub fn with_gestures(mut self, gestures: Vec<String>) -> Self {
        self.gestures = gestures;
        self
    }

    /// Builder: Set voice inflections.
    pub fn with_voice_inflections(mut self, inflections: Vec<String>) -> Self {
        self.voice_inflections = inflections;
        self
    }

    /// Builder: Set diction quirks.
    pub fn with_diction_quirks(mut self, quirks: Vec<String>) -> Self {
        self.diction_quirks = quirks;
        self
    }

    /// Builder: Set onomatopoeia tokens.
    pub fn with_onomatopoeia(mut self, tokens: Vec<String>) -> Self {
        self.onomatopoeia = tokens;
        self
    }

    /// True for protagonist or hero roles.
    pub fn is_protagonist(&self) -> bool {
        let role = self.role.to_lowercase();
        role.contains("protagonist") || role.contains("hero")
    }

    /// True for antagonist or villain roles.
    pub fn is_antagonist(&self) -> bool {
        let role = self.role.to_lowercase();
        role.contains("antagonist") || role.contains("villain")
    }

    /// Role bucket used by role-keyed tables.
    pub fn role_key(&self) -> &'static str {
        let role = self.role.to_lowercase();
        if self.is_protagonist() {
            "protagonist"
        } else if self.is_antagonist() {
            "antagonist"
        } else if role.contains("mentor") {
            "mentor"
        } else if role.contains("sidekick") {
            "sidekick"
        } else {
            "default"
        }
    }
}

/// First protagonist/hero, else the first character.
pub fn lead_character(characters: &[Character]) -> Option<&Character> {
    characters
        .iter()
        .find(|c| c.is_protagonist())
        .or_else(|| characters.first())
}

// =============================================================================
// STORY STRUCTURE
// =============================================================================

/// A top-level narrative division.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct Act {
    /// 1-based
    pub number: u32,
    pub name: String,
    pub description: String,
    /// Seconds
    pub duration: u32,
    pub scene_ids: Vec<String>,
}

/// A point on the emotional arc.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct EmotionalBeat {
    pub id: String,
    pub emotion: String,
    /// 0.0 - 1.0
    pub intensity: f64,
    /// Seconds from the start
    pub timestamp: f64,
}

/// Acts, themes and emotional arc of the project.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct StoryStructure {
    pub id: String,
    pub title: String,
    pub logline: String,
    pub acts: Vec<Act>,
    pub themes: Vec<String>,
    pub emotional_arc: Vec<EmotionalBeat>,
}

impl StoryStructure {
    /// All scene ids in act order.
    pub fn scene_ids(&self) -> Vec<&str> {
        self.acts
            .iter()
            .flat_map(|act| act.scene_ids.iter().map(String::as_str))
            .collect()
    }

    /// Number of scenes across all acts.
    pub fn total_scenes(&self) -> usize {
        self.acts.iter().map(|act| act.scene_ids.len()).sum()
    }

    /// Sum of act durations in seconds.
    pub fn total_duration(&self) -> u32 {
        self.acts.iter().map(|act| act.duration).sum()
    }
}

// =============================================================================
// DIALOGUE
// =============================================================================

/// A single spoken line.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct DialogueLine {
    pub id: String,
    pub character_id: String,
    /// Denormalized for display
    pub character_name: String,
    pub text: String,
    pub emotion: String,
    pub delivery_notes: String,
}

/// Dialogue for one story scene.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct DialogueScene {
    /// Story scene id this dialogue belongs to
    pub scene_id: String,
    pub name: String,
    pub location: String,
    /// "Beginning" | "Middle" | "End"
    pub time_of_day: String,
    /// Participant character ids
    pub characters: Vec<String>,
    pub dialogue_lines: Vec<DialogueLine>,
    pub action_notes: Vec<String>,
}

/// Scene-by-scene dialogue for the project.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct DialogueScript {
    pub id: String,
    pub scenes: Vec<DialogueScene>,
    pub total_lines: u32,
    /// Seconds
    pub estimated_duration: f64,
}

impl DialogueScript {
    /// A script with no scenes or lines.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Finds the dialogue scene for a story scene id.
    pub fn scene(&self, scene_id: &str) -> Option<&DialogueScene> {
        self.scenes.iter().find(|s| s.scene_id == scene_id)
    }
}

// =============================================================================
// SEQUENCE PLAN
// =============================================================================

/// Text fragments handed to the media rendering stage.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct PromptModules {
    pub base: String,
    pub style: String,
    pub lighting: String,
    pub composition: String,
    pub camera: String,
}

impl PromptModules {
    /// Joins the non-empty fragments into a single render prompt.
    pub fn combined(&self) -> String {
        [
            &self.base,
            &self.style,
            &self.lighting,
            &self.composition,
            &self.camera,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A single camera shot.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct Shot {
    pub id: String,
    /// 1-based, contiguous within its sequence
    pub shot_number: u32,
    /// "establishing" | "wide" | "close-up" | "medium" | "two-shot"
    pub shot_type: String,
    /// Seconds
    pub duration: u32,
    pub description: String,
    pub camera_angle: String,
    pub camera_movement: String,
    pub lighting: String,
    pub composition: String,
    pub prompt_modules: PromptModules,
}

/// The shots covering one act.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct Sequence {
    pub id: String,
    pub name: String,
    /// Seconds
    pub duration: u32,
    pub shots: Vec<Shot>,
    pub mood: String,
    pub visual_direction: String,
}

/// Shot-by-shot plan, one sequence per act.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct SequencePlan {
    pub id: String,
    pub total_duration: u32,
    pub sequences: Vec<Sequence>,
    pub total_shots: u32,
}

// =============================================================================
// MUSIC
// =============================================================================

/// A sound effect placed on the timeline.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct SoundEffect {
    pub id: String,
    pub name: String,
    pub description: String,
    pub timestamp: f64,
}

/// A point on the music timeline.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct MusicCue {
    pub id: String,
    pub timestamp: f64,
    pub description: String,
    /// 0.0 - 1.0
    pub intensity: f64,
}

/// Score and sound design for the project.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct MusicDescription {
    pub id: String,
    pub genre: String,
    /// At most 3 entries
    pub mood: Vec<String>,
    pub tempo: String,
    pub instruments: Vec<String>,
    pub sound_effects: Vec<SoundEffect>,
    /// Ordered by timestamp
    pub timeline: Vec<MusicCue>,
}

// =============================================================================
// PROJECT
// =============================================================================

/// Project-level bookkeeping.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct ProjectMetadata {
    pub id: String,
    pub name: String,
    /// Timestamps (milliseconds since epoch)
    pub created_at: i64,
    pub updated_at: i64,
    pub version: String,
    pub video_type: String,
    pub duration: u32,
    pub aspect_ratio: String,
    /// "WIDTHxHEIGHT"
    pub resolution: String,
    pub author: String,
}

/// Aggregate root of one generation run.
#[derive(Debug, Clone, Default, Reconcile, Hydrate, Serialize, Deserialize, PartialEq)]
pub struct ProjectComponents {
    pub metadata: ProjectMetadata,
    pub prompt: ParsedPrompt,
    pub world: WorldConfig,
    pub characters: Vec<Character>,
    pub story: StoryStructure,
    pub dialogue: DialogueScript,
    pub sequence_plan: SequencePlan,
    pub music: MusicDescription,
    /// Final coherence report, after any auto-correction
    pub coherence: CoherenceReport,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prompt() -> ParsedPrompt {
        ParsedPrompt::new("Neon Rain", "cyberpunk", "trailer", 60)
            .with_mood("dark")
            .with_setting("Neo Tokyo")
            .with_key_element("stolen memory chip")
    }

    #[test]
    fn test_prompt_builder() {
        let prompt = sample_prompt();
        assert_eq!(prompt.title, "Neon Rain");
        assert_eq!(prompt.aspect_ratio, "16:9");
        assert_eq!(prompt.first_mood(), Some("dark"));
        assert_eq!(prompt.first_key_element(), Some("stolen memory chip"));
        assert!(prompt.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let prompt = ParsedPrompt::new("T", "drama", "short_film", 0);
        let err = prompt.validate().unwrap_err();
        assert!(matches!(
            err,
            GenError::InvalidPrompt { ref field, .. } if field == "duration_seconds"
        ));
    }

    #[test]
    fn test_validate_caps_duration() {
        let longest = ParsedPrompt::new("T", "drama", "short_film", MAX_DURATION_SECONDS);
        assert!(longest.validate().is_ok());

        let err = ParsedPrompt::new("T", "drama", "short_film", u32::MAX)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid prompt field `duration_seconds`: must be at most 14400 seconds"
        );
    }

    #[test]
    fn test_validate_rejects_empty_genre() {
        let prompt = ParsedPrompt::new("T", " ", "short_film", 10);
        assert!(matches!(
            prompt.validate(),
            Err(GenError::InvalidPrompt { ref field, .. }) if field == "genre"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_aspect_ratio() {
        for bad in ["", "16x9", "16:0", "a:b", "1:2:3"] {
            let prompt = sample_prompt().with_aspect_ratio(bad);
            assert!(prompt.validate().is_err(), "accepted {:?}", bad);
        }
        assert!(sample_prompt().with_aspect_ratio("2.39:1").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_confidence_out_of_range() {
        let prompt = sample_prompt().with_confidence("genre", 1.5);
        assert!(prompt.validate().is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(sample_prompt().fingerprint(), sample_prompt().fingerprint());
        assert_ne!(
            sample_prompt().fingerprint(),
            sample_prompt().with_mood("tense").fingerprint()
        );
    }

    #[test]
    fn test_character_roles() {
        let hero = Character::new("char-1", "Kai", "Reluctant Hero");
        let villain = Character::new("char-2", "Vex", "villain");
        let mentor = Character::new("char-3", "Ona", "mentor");
        let other = Character::new("char-4", "Bo", "bartender");

        assert!(hero.is_protagonist());
        assert_eq!(hero.role_key(), "protagonist");
        assert!(villain.is_antagonist());
        assert_eq!(villain.role_key(), "antagonist");
        assert_eq!(mentor.role_key(), "mentor");
        assert_eq!(other.role_key(), "default");
    }

    #[test]
    fn test_lead_character() {
        let cast = vec![
            Character::new("char-1", "Vex", "antagonist"),
            Character::new("char-2", "Kai", "protagonist"),
        ];
        assert_eq!(lead_character(&cast).unwrap().name, "Kai");

        let no_hero = vec![Character::new("char-1", "Bo", "bartender")];
        assert_eq!(lead_character(&no_hero).unwrap().name, "Bo");
        assert!(lead_character(&[]).is_none());
    }

    #[test]
    fn test_story_scene_helpers() {
        let story = StoryStructure {
            acts: vec![
                Act {
                    number: 1,
                    duration: 10,
                    scene_ids: vec!["scene-1-1".into(), "scene-1-2".into()],
                    ..Default::default()
                },
                Act {
                    number: 2,
                    duration: 20,
                    scene_ids: vec!["scene-2-1".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(story.scene_ids(), vec!["scene-1-1", "scene-1-2", "scene-2-1"]);
        assert_eq!(story.total_scenes(), 3);
        assert_eq!(story.total_duration(), 30);
    }

    #[test]
    fn test_prompt_modules_combined_skips_empty() {
        let modules = PromptModules {
            base: "wide shot, Neo Tokyo".into(),
            style: String::new(),
            lighting: "neon".into(),
            composition: String::new(),
            camera: "wide, professional cinematography".into(),
        };
        assert_eq!(
            modules.combined(),
            "wide shot, Neo Tokyo, neon, wide, professional cinematography"
        );
    }

    #[test]
    fn test_prompt_json_defaults() {
        let json = r#"{"title":"T","genre":"drama","video_type":"teaser","duration_seconds":30}"#;
        let prompt: ParsedPrompt = serde_json::from_str(json).unwrap();
        assert!(prompt.characters.is_empty());
        assert!(prompt.mood.is_empty());
        assert_eq!(prompt.duration_seconds, 30);
    }
}
