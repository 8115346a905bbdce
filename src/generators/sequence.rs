//! Sequence planning: one sequence of shots per act, with camera, lighting,
//! composition and the per-shot prompt modules handed to rendering.

use crate::generators::table::{cycle, LookupTable};
use crate::generators::ActPosition;
use crate::project::model::{
    Act, DialogueScript, ParsedPrompt, PromptModules, Sequence, SequencePlan, Shot,
    StoryStructure, WorldConfig,
};

pub const ESTABLISHING: &str = "establishing";
pub const WIDE: &str = "wide";
pub const CLOSE_UP: &str = "close-up";
pub const MEDIUM: &str = "medium";
pub const TWO_SHOT: &str = "two-shot";

const MIN_SHOTS_PER_SEQUENCE: u32 = 2;

/// Average shot length in seconds per video type.
static AVG_SHOT_DURATION: LookupTable<u32> = LookupTable::new(&[
    ("trailer", 3),
    ("teaser", 4),
    ("short_film", 6),
    ("music_video", 2),
    ("commercial", 5),
    ("default", 5),
]);

/// Fixed `(angle, movement)` for the anchored shot types. Keys are
/// normalized shot types.
static FIXED_CAMERA: LookupTable<Option<(&str, &str)>> = LookupTable::new(&[
    ("establishing", Some(("high angle", "slow push in"))),
    ("close_up", Some(("eye level", "static"))),
    ("wide", Some(("low angle", "slow pull out"))),
    ("default", None),
]);

const CAMERA_ANGLES: &[&str] = &[
    "eye level",
    "low angle",
    "high angle",
    "dutch angle",
    "over the shoulder",
];

const CAMERA_MOVEMENTS: &[&str] = &[
    "static",
    "pan left",
    "tracking",
    "dolly in",
    "handheld",
    "crane up",
];

static COMPOSITIONS: LookupTable<&str> = LookupTable::new(&[
    ("establishing", "rule of thirds, expansive environment"),
    ("wide", "symmetrical framing, full scene"),
    ("close_up", "tight framing, shallow depth of field"),
    ("medium", "balanced framing, waist-up"),
    ("two_shot", "two subjects, balanced negative space"),
    ("default", "balanced framing"),
]);

/// Builds the [`SequencePlan`] for a story.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequencePlanner;

impl SequencePlanner {
    pub fn new() -> Self {
        Self
    }

    /// Plans exactly one sequence per act.
    #[tracing::instrument(
        skip_all,
        fields(video_type = %prompt.video_type, acts = story.acts.len())
    )]
    pub fn generate(
        &self,
        prompt: &ParsedPrompt,
        story: &StoryStructure,
        dialogue: &DialogueScript,
        world: &WorldConfig,
    ) -> SequencePlan {
        let avg_shot = (*AVG_SHOT_DURATION.get(&prompt.video_type)).max(1);
        let act_count = story.acts.len();

        let sequences: Vec<Sequence> = story
            .acts
            .iter()
            .enumerate()
            .map(|(i, act)| {
                let position = ActPosition::of(i, act_count);
                self.plan_sequence(prompt, act, position, avg_shot, dialogue, world)
            })
            .collect();

        let total_shots: usize = sequences.iter().map(|s| s.shots.len()).sum();
        tracing::debug!(sequences = sequences.len(), total_shots, "Sequence plan generated");

        SequencePlan {
            id: format!("sequence-plan-{}", prompt.fingerprint().simple()),
            total_duration: prompt.duration_seconds,
            sequences,
            total_shots: total_shots as u32,
        }
    }

    fn plan_sequence(
        &self,
        prompt: &ParsedPrompt,
        act: &Act,
        position: ActPosition,
        avg_shot: u32,
        dialogue: &DialogueScript,
        world: &WorldConfig,
    ) -> Sequence {
        let shot_count = (act.duration / avg_shot).max(MIN_SHOTS_PER_SEQUENCE);
        let shot_duration = act.duration / shot_count;
        let lighting = format!("{}, {}", world.lighting_style, lighting_qualifier(position));

        let shots = (1..=shot_count)
            .map(|number| {
                let shot_type = shot_type(number, shot_count);
                let (angle, movement) = camera_for(shot_type, number);
                Shot {
                    id: format!("shot-{}-{}", act.number, number),
                    shot_number: number,
                    shot_type: shot_type.to_string(),
                    duration: shot_duration,
                    description: describe_shot(shot_type, number, shot_count, act, dialogue, world),
                    camera_angle: angle.to_string(),
                    camera_movement: movement.to_string(),
                    lighting: lighting.clone(),
                    composition: COMPOSITIONS.get(shot_type).to_string(),
                    prompt_modules: prompt_modules(prompt, world, shot_type, angle, &lighting),
                }
            })
            .collect();

        Sequence {
            id: format!("seq-{}", act.number),
            name: act.name.clone(),
            duration: act.duration,
            shots,
            mood: sequence_mood(prompt, position),
            visual_direction: format!("{} with {}", world.primary_style(), world.lighting_style),
        }
    }
}

/// Shot type by 1-based position; earlier rules win.
pub fn shot_type(number: u32, count: u32) -> &'static str {
    if number == 1 {
        ESTABLISHING
    } else if number == count {
        WIDE
    } else if number % 3 == 0 {
        CLOSE_UP
    } else if number % 2 == 0 {
        MEDIUM
    } else {
        TWO_SHOT
    }
}

fn camera_for(shot_type: &str, number: u32) -> (&'static str, &'static str) {
    if let Some(fixed) = FIXED_CAMERA.get(shot_type) {
        return *fixed;
    }
    let index = number as usize;
    (
        cycle(CAMERA_ANGLES, index).copied().unwrap_or("eye level"),
        cycle(CAMERA_MOVEMENTS, index).copied().unwrap_or("static"),
    )
}

fn lighting_qualifier(position: ActPosition) -> &'static str {
    match position {
        ActPosition::Opening => "establishing mood",
        ActPosition::Final => "dramatic intensity",
        ActPosition::Middle | ActPosition::Climax => "building tension",
    }
}

fn sequence_mood(prompt: &ParsedPrompt, position: ActPosition) -> String {
    match position {
        ActPosition::Opening => prompt.first_mood().unwrap_or("neutral").to_string(),
        ActPosition::Final => "intense".to_string(),
        ActPosition::Middle | ActPosition::Climax => "tense".to_string(),
    }
}

/// Names the act and, when the shot's slice of the act has a dialogue
/// scene, the characters in it.
fn describe_shot(
    shot_type: &str,
    number: u32,
    count: u32,
    act: &Act,
    dialogue: &DialogueScript,
    world: &WorldConfig,
) -> String {
    let mut description = format!(
        "{} shot of {} during {}",
        capitalize(shot_type),
        location_name(world),
        act.name
    );

    if !act.scene_ids.is_empty() {
        let slice = ((number - 1) as usize * act.scene_ids.len()) / count as usize;
        let scene = act
            .scene_ids
            .get(slice)
            .and_then(|scene_id| dialogue.scene(scene_id));
        if let Some(scene) = scene {
            let names: Vec<&str> = scene
                .dialogue_lines
                .iter()
                .map(|line| line.character_name.as_str())
                .fold(Vec::new(), |mut acc, name| {
                    if !acc.contains(&name) {
                        acc.push(name);
                    }
                    acc
                });
            if !names.is_empty() {
                description.push_str(&format!(", featuring {}", names.join(" and ")));
            }
        }
    }
    description
}

fn prompt_modules(
    prompt: &ParsedPrompt,
    world: &WorldConfig,
    shot_type: &str,
    angle: &str,
    lighting: &str,
) -> PromptModules {
    let mut style = vec![prompt.genre.as_str()];
    style.extend(world.visual_style.iter().take(3).map(String::as_str));

    PromptModules {
        base: format!("{} shot, {}", shot_type, location_name(world)),
        style: style.join(", "),
        lighting: format!("{}, {}", lighting, world.atmosphere),
        composition: format!("{}, cinematic framing", angle),
        camera: format!("{}, professional cinematography", shot_type),
    }
}

fn location_name(world: &WorldConfig) -> &str {
    if world.setting.trim().is_empty() {
        "the scene"
    } else {
        world.setting.as_str()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
