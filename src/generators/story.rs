//! Story structure generation: acts, scenes, logline, themes and the
//! emotional arc.

use crate::generators::table::LookupTable;
use crate::project::model::{
    lead_character, Act, Character, EmotionalBeat, ParsedPrompt, StoryStructure, WorldConfig,
};

/// Act layout for a video type.
struct StructureTemplate {
    act_names: &'static [&'static str],
    /// Fraction of the total duration per act
    ratios: &'static [f64],
    scene_counts: &'static [u32],
}

static STRUCTURE_TEMPLATES: LookupTable<StructureTemplate> = LookupTable::new(&[
    (
        "trailer",
        StructureTemplate {
            act_names: &["Hook", "Escalation", "Climax Tease"],
            ratios: &[0.25, 0.5, 0.25],
            scene_counts: &[2, 3, 2],
        },
    ),
    (
        "teaser",
        StructureTemplate {
            act_names: &["Intrigue", "Reveal"],
            ratios: &[0.4, 0.6],
            scene_counts: &[1, 2],
        },
    ),
    (
        "short_film",
        StructureTemplate {
            act_names: &["Setup", "Confrontation", "Resolution"],
            ratios: &[0.25, 0.5, 0.25],
            scene_counts: &[3, 4, 3],
        },
    ),
    (
        "music_video",
        StructureTemplate {
            act_names: &["Intro", "Verse", "Chorus", "Outro"],
            ratios: &[0.2, 0.3, 0.3, 0.2],
            scene_counts: &[2, 2, 2, 2],
        },
    ),
    (
        "commercial",
        StructureTemplate {
            act_names: &["Problem", "Solution", "Call to Action"],
            ratios: &[0.2, 0.6, 0.2],
            scene_counts: &[1, 2, 1],
        },
    ),
    (
        "default",
        StructureTemplate {
            act_names: &["Beginning", "Middle", "End"],
            ratios: &[0.25, 0.5, 0.25],
            scene_counts: &[2, 3, 2],
        },
    ),
]);

static THEMES: LookupTable<&[&str]> = LookupTable::new(&[
    ("cyberpunk", &["humanity vs technology", "identity", "corporate control", "rebellion"]),
    ("fantasy", &["good vs evil", "destiny", "courage", "friendship"]),
    ("sci_fi", &["exploration", "the unknown", "progress and its cost"]),
    ("horror", &["fear of the unknown", "survival", "isolation"]),
    ("noir", &["corruption", "moral ambiguity", "fate"]),
    ("romance", &["love", "vulnerability", "second chances"]),
    ("comedy", &["misunderstanding", "friendship", "self-acceptance"]),
    ("drama", &["family", "redemption", "loss"]),
    ("action", &["justice", "sacrifice", "loyalty"]),
    ("default", &["transformation", "conflict", "resolution"]),
]);

/// `(emotion, intensity, normalized position)`
type BeatTemplate = (&'static str, f64, f64);

static EMOTIONAL_ARCS: LookupTable<&[BeatTemplate]> = LookupTable::new(&[
    (
        "trailer",
        &[
            ("intrigue", 0.3, 0.0),
            ("tension", 0.6, 0.3),
            ("excitement", 0.9, 0.7),
            ("anticipation", 1.0, 0.95),
        ],
    ),
    (
        "teaser",
        &[("curiosity", 0.4, 0.0), ("mystery", 0.7, 0.5), ("anticipation", 0.9, 0.9)],
    ),
    (
        "short_film",
        &[
            ("calm", 0.2, 0.0),
            ("curiosity", 0.4, 0.15),
            ("conflict", 0.6, 0.4),
            ("despair", 0.5, 0.6),
            ("triumph", 1.0, 0.8),
            ("resolution", 0.3, 1.0),
        ],
    ),
    (
        "music_video",
        &[
            ("energy", 0.5, 0.0),
            ("build", 0.7, 0.4),
            ("euphoria", 1.0, 0.75),
            ("release", 0.4, 1.0),
        ],
    ),
    (
        "commercial",
        &[("frustration", 0.4, 0.0), ("hope", 0.6, 0.4), ("satisfaction", 0.9, 0.8)],
    ),
    (
        "default",
        &[
            ("setup", 0.3, 0.0),
            ("rising action", 0.6, 0.35),
            ("climax", 1.0, 0.75),
            ("resolution", 0.4, 1.0),
        ],
    ),
]);

const MAX_TEMPLATE_THEMES: usize = 3;

/// Builds the [`StoryStructure`] for a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryStructureGenerator;

impl StoryStructureGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates acts, logline, themes and emotional arc.
    #[tracing::instrument(
        skip_all,
        fields(video_type = %prompt.video_type, duration = prompt.duration_seconds)
    )]
    pub fn generate(
        &self,
        prompt: &ParsedPrompt,
        world: &WorldConfig,
        characters: &[Character],
    ) -> StoryStructure {
        let acts = self.build_acts(prompt, world);
        let story = StoryStructure {
            id: format!("story-{}", prompt.fingerprint().simple()),
            title: prompt.title.clone(),
            logline: self.logline(prompt, characters),
            acts,
            themes: self.themes(prompt),
            emotional_arc: self.emotional_arc(prompt),
        };

        tracing::debug!(
            acts = story.acts.len(),
            scenes = story.total_scenes(),
            beats = story.emotional_arc.len(),
            "Story structure generated"
        );
        story
    }

    fn build_acts(&self, prompt: &ParsedPrompt, world: &WorldConfig) -> Vec<Act> {
        let template = STRUCTURE_TEMPLATES.get(&prompt.video_type);
        let total = prompt.duration_seconds as f64;
        let count = template.ratios.len();

        template
            .ratios
            .iter()
            .enumerate()
            .map(|(i, ratio)| {
                let number = (i + 1) as u32;
                let name = template.act_names.get(i).copied().unwrap_or("Act");
                let scenes = template.scene_counts.get(i).copied().unwrap_or(1);
                Act {
                    number,
                    name: name.to_string(),
                    description: act_description(name, i, count, world),
                    duration: (total * ratio).floor() as u32,
                    scene_ids: (1..=scenes)
                        .map(|s| format!("scene-{}-{}", number, s))
                        .collect(),
                }
            })
            .collect()
    }

    fn logline(&self, prompt: &ParsedPrompt, characters: &[Character]) -> String {
        let lead = lead_character(characters)
            .map(|c| c.name.as_str())
            .unwrap_or("the protagonist");
        let setting = non_empty(&prompt.setting, "an unfamiliar world");
        let element = prompt.first_key_element().unwrap_or("an impossible choice");
        let mood = prompt.first_mood().unwrap_or("gripping");
        let genre = non_empty(&prompt.genre, "cinematic");

        format!(
            "In {}, {} must confront {} in this {} {} story.",
            setting, lead, element, mood, genre
        )
    }

    fn themes(&self, prompt: &ParsedPrompt) -> Vec<String> {
        let mut themes: Vec<String> = THEMES
            .get(&prompt.genre)
            .iter()
            .take(MAX_TEMPLATE_THEMES)
            .map(|t| t.to_string())
            .collect();

        if let Some(element) = prompt.first_key_element() {
            let theme = element.trim().to_lowercase();
            if !theme.is_empty() && !themes.contains(&theme) {
                themes.push(theme);
            }
        }
        themes
    }

    fn emotional_arc(&self, prompt: &ParsedPrompt) -> Vec<EmotionalBeat> {
        let total = prompt.duration_seconds as f64;
        EMOTIONAL_ARCS
            .get(&prompt.video_type)
            .iter()
            .enumerate()
            .map(|(i, (emotion, intensity, position))| EmotionalBeat {
                id: format!("beat-{}", i + 1),
                emotion: emotion.to_string(),
                intensity: *intensity,
                timestamp: position * total,
            })
            .collect()
    }
}

fn act_description(name: &str, index: usize, count: usize, world: &WorldConfig) -> String {
    let purpose = if index == 0 {
        "introduces the world and its stakes"
    } else if index + 1 == count {
        "brings the story to its conclusion"
    } else {
        "raises the stakes and deepens the conflict"
    };
    let setting = non_empty(&world.setting, "the world");
    format!("{} {} in {}", name, purpose, setting)
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
