//! Score and sound design: genre, moods, tempo, instruments, one sound
//! effect and one music cue per act, and a closing fade-out cue.

use crate::generators::table::{cycle, LookupTable};
use crate::generators::ActPosition;
use crate::project::model::{
    MusicCue, MusicDescription, ParsedPrompt, SoundEffect, StoryStructure,
};

const MAX_MOODS: usize = 3;
const PROMPT_MOODS: usize = 2;
const FADE_OUT_INTENSITY: f64 = 0.3;
const DEFAULT_TEMPO: &str = "moderate";

struct MusicTemplate {
    genre: &'static str,
    moods: &'static [&'static str],
    sound_effects: &'static [&'static str],
}

static MUSIC_TEMPLATES: LookupTable<MusicTemplate> = LookupTable::new(&[
    (
        "cyberpunk",
        MusicTemplate {
            genre: "dark electronic synthwave",
            moods: &["dark", "pulsing", "tense"],
            sound_effects: &["electric hum", "rain on neon signs", "hover traffic", "data glitch"],
        },
    ),
    (
        "fantasy",
        MusicTemplate {
            genre: "orchestral epic",
            moods: &["epic", "mystical", "adventurous"],
            sound_effects: &[
                "wind through trees",
                "distant thunder",
                "sword clash",
                "magic shimmer",
            ],
        },
    ),
    (
        "sci_fi",
        MusicTemplate {
            genre: "ambient electronic",
            moods: &["vast", "mysterious", "awe"],
            sound_effects: &["engine rumble", "console beeps", "airlock hiss"],
        },
    ),
    (
        "horror",
        MusicTemplate {
            genre: "dark ambient",
            moods: &["eerie", "dread", "suspenseful"],
            sound_effects: &["creaking door", "heartbeat", "whispers", "sudden sting"],
        },
    ),
    (
        "noir",
        MusicTemplate {
            genre: "smoky jazz",
            moods: &["melancholic", "mysterious", "tense"],
            sound_effects: &["rain on pavement", "distant siren", "lighter flick"],
        },
    ),
    (
        "romance",
        MusicTemplate {
            genre: "romantic strings",
            moods: &["tender", "warm", "bittersweet"],
            sound_effects: &["soft breeze", "cafe murmur", "heartbeat"],
        },
    ),
    (
        "comedy",
        MusicTemplate {
            genre: "playful pop",
            moods: &["upbeat", "quirky", "lighthearted"],
            sound_effects: &["slide whistle", "crowd laughter", "comedic boing"],
        },
    ),
    (
        "action",
        MusicTemplate {
            genre: "hybrid orchestral action",
            moods: &["intense", "driving", "heroic"],
            sound_effects: &["explosion", "gunfire", "screeching tires"],
        },
    ),
    (
        "default",
        MusicTemplate {
            genre: "cinematic orchestral",
            moods: &["emotional", "dramatic", "uplifting"],
            sound_effects: &["ambient room tone", "footsteps", "whoosh transition"],
        },
    ),
]);

static TEMPO_BY_MOOD: LookupTable<&str> = LookupTable::new(&[
    ("dark", "slow"),
    ("tense", "moderate"),
    ("epic", "moderate to fast"),
    ("intense", "fast"),
    ("upbeat", "fast"),
    ("energetic", "fast"),
    ("melancholic", "slow"),
    ("tender", "slow"),
    ("eerie", "very slow"),
    ("mysterious", "slow"),
    ("default", "moderate"),
]);

static INSTRUMENTS: LookupTable<&[&str]> = LookupTable::new(&[
    ("cyberpunk", &["analog synthesizer", "drum machine", "distorted bass", "arpeggiator"]),
    ("fantasy", &["full orchestra", "choir", "french horn", "celtic harp"]),
    ("sci_fi", &["synth pads", "modular synthesizer", "string ensemble"]),
    ("horror", &["prepared piano", "string clusters", "low drones"]),
    ("noir", &["muted trumpet", "upright bass", "brushed drums", "piano"]),
    ("romance", &["piano", "string quartet", "acoustic guitar"]),
    ("comedy", &["pizzicato strings", "clarinet", "glockenspiel"]),
    ("action", &["taiko drums", "brass section", "electric guitar", "strings"]),
    ("default", &["piano", "strings", "percussion"]),
]);

/// Builds the [`MusicDescription`] for a story.
#[derive(Debug, Clone, Copy, Default)]
pub struct MusicDescriptionGenerator;

impl MusicDescriptionGenerator {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(skip_all, fields(genre = %prompt.genre, acts = story.acts.len()))]
    pub fn generate(&self, prompt: &ParsedPrompt, story: &StoryStructure) -> MusicDescription {
        let template = MUSIC_TEMPLATES.get(&prompt.genre);
        let mood = merge_moods(&prompt.mood, template.moods);
        let tempo = prompt
            .first_mood()
            .map(|m| *TEMPO_BY_MOOD.get(m))
            .unwrap_or(DEFAULT_TEMPO);

        let act_count = story.acts.len();
        let mut sound_effects = Vec::with_capacity(act_count);
        let mut timeline = Vec::with_capacity(act_count + 1);
        let mut start = 0u32;

        for (i, act) in story.acts.iter().enumerate() {
            let timestamp = start as f64;
            let position = ActPosition::of(i, act_count);

            if let Some(name) = cycle(template.sound_effects, i) {
                sound_effects.push(SoundEffect {
                    id: format!("sfx-{}", i + 1),
                    name: name.to_string(),
                    description: format!("{} during {}", name, act.name),
                    timestamp,
                });
            }

            let (intensity, description) = cue_for(position);
            timeline.push(MusicCue {
                id: format!("cue-{}", i + 1),
                timestamp,
                description: format!("{}: {}", act.name, description),
                intensity,
            });
            start += act.duration;
        }

        timeline.push(MusicCue {
            id: format!("cue-{}", act_count + 1),
            timestamp: prompt.duration_seconds as f64,
            description: "Music fades out".to_string(),
            intensity: FADE_OUT_INTENSITY,
        });

        tracing::debug!(
            cues = timeline.len(),
            sound_effects = sound_effects.len(),
            tempo,
            "Music description generated"
        );

        MusicDescription {
            id: format!("music-{}", prompt.fingerprint().simple()),
            genre: template.genre.to_string(),
            mood,
            tempo: tempo.to_string(),
            instruments: INSTRUMENTS
                .get(&prompt.genre)
                .iter()
                .map(|i| i.to_string())
                .collect(),
            sound_effects,
            timeline,
        }
    }
}

/// First two prompt moods, then template moods, without duplicates.
fn merge_moods(prompt_moods: &[String], template_moods: &[&str]) -> Vec<String> {
    let candidates = prompt_moods
        .iter()
        .take(PROMPT_MOODS)
        .map(|m| m.trim().to_lowercase())
        .chain(template_moods.iter().map(|m| m.to_string()));

    let mut moods: Vec<String> = Vec::with_capacity(MAX_MOODS);
    for mood in candidates {
        if moods.len() == MAX_MOODS {
            break;
        }
        if !mood.is_empty() && !moods.contains(&mood) {
            moods.push(mood);
        }
    }
    moods
}

fn cue_for(position: ActPosition) -> (f64, &'static str) {
    match position {
        ActPosition::Opening => (0.4, "main theme introduced"),
        ActPosition::Middle => (0.6, "tension builds"),
        ActPosition::Climax => (1.0, "full intensity at the peak"),
        ActPosition::Final => (0.9, "resolving theme"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::story::StoryStructureGenerator;
    use crate::project::model::WorldConfig;

    fn generate(prompt: &ParsedPrompt) -> (StoryStructure, MusicDescription) {
        let story = StoryStructureGenerator::new().generate(prompt, &WorldConfig::default(), &[]);
        let music = MusicDescriptionGenerator::new().generate(prompt, &story);
        (story, music)
    }

    #[test]
    fn test_tables_have_defaults() {
        assert!(MUSIC_TEMPLATES.has_default());
        assert!(TEMPO_BY_MOOD.has_default());
        assert!(INSTRUMENTS.has_default());
    }

    #[test]
    fn test_cyberpunk_is_electronic() {
        let prompt = ParsedPrompt::new("Neon Rain", "cyberpunk", "trailer", 60);
        let (_, music) = generate(&prompt);
        assert!(music.genre.contains("electronic") || music.genre.contains("synth"));
        assert_eq!(music.instruments[0], "analog synthesizer");
    }

    #[test]
    fn test_moodless_prompt_gets_default_tempo() {
        let prompt = ParsedPrompt::new("Neon Rain", "cyberpunk", "trailer", 60);
        let (_, music) = generate(&prompt);
        assert_eq!(music.mood, vec!["dark", "pulsing", "tense"]);
        assert_eq!(music.tempo, "moderate");

        let dark = generate(&prompt.clone().with_mood("Dark")).1;
        assert_eq!(dark.tempo, "slow");
    }

    #[test]
    fn test_moods_merged_and_capped() {
        let prompt = ParsedPrompt::new("T", "cyberpunk", "trailer", 60)
            .with_mood("Tense")
            .with_mood("dark")
            .with_mood("hopeful");
        let (_, music) = generate(&prompt);
        assert_eq!(music.mood, vec!["tense", "dark", "pulsing"]);
        assert_eq!(music.tempo, "moderate");
    }

    #[test]
    fn test_unknown_genre_and_mood_fall_back() {
        let prompt = ParsedPrompt::new("T", "western", "teaser", 30).with_mood("dusty");
        let (_, music) = generate(&prompt);
        assert_eq!(music.genre, "cinematic orchestral");
        assert_eq!(music.mood, vec!["dusty", "emotional", "dramatic"]);
        assert_eq!(music.tempo, "moderate");
        assert_eq!(music.instruments, vec!["piano", "strings", "percussion"]);
    }

    #[test]
    fn test_timeline_per_act() {
        let prompt = ParsedPrompt::new("T", "cyberpunk", "trailer", 60);
        let (story, music) = generate(&prompt);

        assert_eq!(music.timeline.len(), story.acts.len() + 1);
        let stamps: Vec<f64> = music.timeline.iter().map(|c| c.timestamp).collect();
        assert_eq!(stamps, vec![0.0, 15.0, 45.0, 60.0]);
        let intensities: Vec<f64> = music.timeline.iter().map(|c| c.intensity).collect();
        // opening, climax (second-to-last), final, fade out
        assert_eq!(intensities, vec![0.4, 1.0, 0.9, 0.3]);
        assert_eq!(music.timeline[3].id, "cue-4");
    }

    #[test]
    fn test_middle_act_intensity() {
        let prompt = ParsedPrompt::new("T", "pop", "music_video", 100);
        let (_, music) = generate(&prompt);
        let intensities: Vec<f64> = music.timeline.iter().map(|c| c.intensity).collect();
        assert_eq!(intensities, vec![0.4, 0.6, 1.0, 0.9, 0.3]);
    }

    #[test]
    fn test_sound_effects_cycle() {
        let prompt = ParsedPrompt::new("T", "noir", "music_video", 100);
        let (_, music) = generate(&prompt);
        let names: Vec<&str> = music.sound_effects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["rain on pavement", "distant siren", "lighter flick", "rain on pavement"]
        );
        assert_eq!(music.sound_effects[1].timestamp, 20.0);
        assert_eq!(music.sound_effects[3].id, "sfx-4");
    }

    #[test]
    fn test_timeline_reaches_end() {
        for video_type in ["trailer", "teaser", "short_film", "music_video", "commercial", "vlog"] {
            let prompt = ParsedPrompt::new("T", "drama", video_type, 47);
            let (_, music) = generate(&prompt);
            assert!(music.timeline.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
            let last = music.timeline.last().map(|c| c.timestamp).unwrap_or_default();
            assert!(last >= 0.8 * 47.0, "{}", video_type);
        }
    }
}
