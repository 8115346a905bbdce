//! Artifact generators.
//!
//! Each generator is a pure, deterministic function of its inputs:
//! - `world`: prompt -> [`WorldConfig`](crate::WorldConfig) (swappable collaborator)
//! - `character`: prompt + world -> cast (swappable collaborator)
//! - `story`: acts, logline, themes and emotional arc
//! - `dialogue`: scene-by-scene dialogue script
//! - `sequence`: shot-by-shot sequence plan
//! - `music`: score, sound effects and cue timeline
//! - `table`: the keyed lookup tables they all draw from

pub mod character;
pub mod dialogue;
pub mod music;
pub mod sequence;
pub mod story;
pub mod table;
pub mod world;

pub use character::{BriefCharacterGenerator, CharacterGenerator};
pub use dialogue::DialogueScriptGenerator;
pub use music::MusicDescriptionGenerator;
pub use sequence::SequencePlanner;
pub use story::StoryStructureGenerator;
pub use table::LookupTable;
pub use world::{TemplateWorldGenerator, WorldGenerator};

/// Where an act sits in the structure.
///
/// Precedence: the first act is `Opening`, then the last act is `Final`,
/// then the second-to-last is `Climax`; everything else is `Middle`.
/// A one-act structure is therefore `Opening`, and a two-act structure is
/// `Opening` then `Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActPosition {
    Opening,
    Middle,
    Climax,
    Final,
}

impl ActPosition {
    /// Classifies the act at `index` (0-based) out of `count` acts.
    pub fn of(index: usize, count: usize) -> Self {
        if index == 0 {
            Self::Opening
        } else if index + 1 == count {
            Self::Final
        } else if index + 2 == count {
            Self::Climax
        } else {
            Self::Middle
        }
    }

    /// Scene context key used by the dialogue tables.
    pub fn scene_context(self) -> &'static str {
        match self {
            Self::Opening => "setup",
            Self::Middle => "conflict",
            Self::Climax => "climax",
            Self::Final => "resolution",
        }
    }

    /// Coarse time-of-day label for scenes in this act.
    pub fn time_label(self) -> &'static str {
        match self {
            Self::Opening => "Beginning",
            Self::Middle | Self::Climax => "Middle",
            Self::Final => "End",
        }
    }
}
