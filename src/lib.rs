//! HeyoGen - Deterministic project generation for AI video pipelines.
//!
//! Expands a structured creative brief ([`ParsedPrompt`]) into a complete,
//! internally consistent production plan:
//!
//! - **World and cast**: visual rules and characters (pluggable generators)
//! - **Story**: acts, scenes, logline, themes and an emotional arc
//! - **Dialogue**: a scene-by-scene script driven by character capabilities
//! - **Sequences**: shot-by-shot plans with per-shot prompt modules
//! - **Music**: score, sound effects and a cue timeline
//!
//! The artifacts are cross-checked for coherence, and the result can be
//! stored in an Automerge [`ProjectDocument`] for collaborative editing.
//!
//! # Example
//!
//! ```rust
//! use heyogen::{CharacterBrief, ComponentGenerator, ParsedPrompt};
//!
//! let prompt = ParsedPrompt::new("Neon Rain", "cyberpunk", "trailer", 60)
//!     .with_mood("dark")
//!     .with_setting("Neo Tokyo")
//!     .with_character(CharacterBrief::new("Kai", "protagonist"));
//!
//! let project = ComponentGenerator::new().generate(&prompt).unwrap();
//!
//! assert_eq!(project.story.acts.len(), 3);
//! assert_eq!(project.sequence_plan.sequences.len(), 3);
//! assert!(project.coherence.is_coherent);
//! ```

pub mod config;
pub mod error;
pub mod generators;
pub mod pipeline;
pub mod project;

// Re-exports for convenience
pub use config::GeneratorConfig;
pub use error::{GenError, GenResult};
pub use generators::{
    BriefCharacterGenerator, CharacterGenerator, DialogueScriptGenerator,
    MusicDescriptionGenerator, SequencePlanner, StoryStructureGenerator, TemplateWorldGenerator,
    WorldGenerator,
};
pub use pipeline::{
    validate_coherence, AutoCorrector, CoherenceIssue, CoherenceReport, ComponentGenerator,
    IssueType, NoopCorrector, RederiveCorrector, Severity,
};
pub use project::{
    CharacterBrief, Character, DialogueScript, MusicDescription, ParsedPrompt, ProjectComponents,
    ProjectDocument, ProjectMetadata, PromptModules, SequencePlan, StoryStructure, WorldConfig,
    MAX_DURATION_SECONDS,
};

#[cfg(feature = "wasm")]
pub use project::JsProjectGenerator;
