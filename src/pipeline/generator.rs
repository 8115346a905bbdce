//! The orchestrator: runs every generator in dependency order, stamps
//! project metadata, validates coherence and optionally auto-corrects.

use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::error::GenResult;
use crate::generators::{
    BriefCharacterGenerator, CharacterGenerator, DialogueScriptGenerator,
    MusicDescriptionGenerator, SequencePlanner, StoryStructureGenerator, TemplateWorldGenerator,
    WorldGenerator,
};
use crate::pipeline::coherence::{self, CoherenceReport};
use crate::pipeline::correction::{AutoCorrector, NoopCorrector};
use crate::project::model::{ParsedPrompt, ProjectComponents, ProjectMetadata};

/// Generates a complete [`ProjectComponents`] from a [`ParsedPrompt`].
///
/// World and cast generation and auto-correction are pluggable; story,
/// dialogue, sequence and music generation are table driven.
pub struct ComponentGenerator {
    config: GeneratorConfig,
    world_generator: Box<dyn WorldGenerator>,
    character_generator: Box<dyn CharacterGenerator>,
    corrector: Box<dyn AutoCorrector>,
    story_generator: StoryStructureGenerator,
    dialogue_generator: DialogueScriptGenerator,
    sequence_planner: SequencePlanner,
    music_generator: MusicDescriptionGenerator,
}

impl Default for ComponentGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentGenerator {
    /// Creates a generator with the built-in collaborators, the default
    /// config and a [`NoopCorrector`].
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            world_generator: Box::new(TemplateWorldGenerator::new()),
            character_generator: Box::new(BriefCharacterGenerator::new()),
            corrector: Box::new(NoopCorrector),
            story_generator: StoryStructureGenerator::new(),
            dialogue_generator: DialogueScriptGenerator::new(),
            sequence_planner: SequencePlanner::new(),
            music_generator: MusicDescriptionGenerator::new(),
        }
    }

    /// Builder: Replace the world generator.
    pub fn with_world_generator(mut self, generator: impl WorldGenerator + 'static) -> Self {
        self.world_generator = Box::new(generator);
        self
    }

    /// Builder: Replace the character generator.
    pub fn with_character_generator(
        mut self,
        generator: impl CharacterGenerator + 'static,
    ) -> Self {
        self.character_generator = Box::new(generator);
        self
    }

    /// Builder: Replace the auto-corrector.
    pub fn with_corrector(mut self, corrector: impl AutoCorrector + 'static) -> Self {
        self.corrector = Box::new(corrector);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the full pipeline.
    ///
    /// Fails only when the prompt is malformed. Coherence problems are
    /// reported on the returned components, after auto-correction when it
    /// is enabled.
    #[tracing::instrument(
        skip_all,
        fields(title = %prompt.title, genre = %prompt.genre, video_type = %prompt.video_type)
    )]
    pub fn generate(&self, prompt: &ParsedPrompt) -> GenResult<ProjectComponents> {
        prompt.validate()?;
        tracing::info!(duration = prompt.duration_seconds, "Generating project");

        let world = self.world_generator.generate(prompt);
        let characters = self.character_generator.generate(prompt, &world);
        let story = self.story_generator.generate(prompt, &world, &characters);
        let dialogue = self.dialogue_generator.generate(prompt, &story, &characters);
        let sequence_plan = self
            .sequence_planner
            .generate(prompt, &story, &dialogue, &world);
        let music = self.music_generator.generate(prompt, &story);

        let components = self.finalize(ProjectComponents {
            metadata: self.build_metadata(prompt),
            prompt: prompt.clone(),
            world,
            characters,
            story,
            dialogue,
            sequence_plan,
            music,
            coherence: CoherenceReport::default(),
        });

        tracing::info!(
            project = %components.metadata.id,
            scenes = components.story.total_scenes(),
            shots = components.sequence_plan.total_shots,
            dialogue_lines = components.dialogue.total_lines,
            "Project generated"
        );
        Ok(components)
    }

    /// Validates `components`, runs the configured corrector when they are
    /// incoherent and auto-correction is on, then stores the final report.
    ///
    /// Issues the corrector cannot resolve stay on `components.coherence`.
    pub fn finalize(&self, mut components: ProjectComponents) -> ProjectComponents {
        let mut report = self.validate_coherence(&components);
        if !report.is_coherent && self.config.auto_correct {
            tracing::info!(issues = report.total_issues, "Auto-correcting components");
            components = self.corrector.correct(components, &report.issues);
            report = self.validate_coherence(&components);
        }
        if !report.is_coherent {
            tracing::warn!(issues = report.total_issues, "Project has unresolved coherence issues");
        }
        components.coherence = report;
        components
    }

    /// Checks cross-artifact consistency without modifying anything.
    pub fn validate_coherence(&self, components: &ProjectComponents) -> CoherenceReport {
        coherence::validate_coherence(components)
    }

    fn build_metadata(&self, prompt: &ParsedPrompt) -> ProjectMetadata {
        let now = chrono::Utc::now().timestamp_millis();
        ProjectMetadata {
            id: Uuid::new_v4().to_string(),
            name: prompt.title.clone(),
            created_at: now,
            updated_at: now,
            version: self.config.version.clone(),
            video_type: prompt.video_type.clone(),
            duration: prompt.duration_seconds,
            aspect_ratio: prompt.aspect_ratio.clone(),
            resolution: self.config.resolution_for(&prompt.aspect_ratio),
            author: self.config.author.clone(),
        }
    }
}

// ===== BATCH GENERATION =====

#[cfg(feature = "async")]
impl ComponentGenerator {
    /// Generates several independent projects concurrently on tokio's
    /// blocking pool. Results keep the order of `prompts`.
    pub async fn generate_batch(
        self: std::sync::Arc<Self>,
        prompts: Vec<ParsedPrompt>,
    ) -> Vec<GenResult<ProjectComponents>> {
        tracing::info!(count = prompts.len(), "Generating batch");

        let handles: Vec<_> = prompts
            .into_iter()
            .map(|prompt| {
                let generator = std::sync::Arc::clone(&self);
                tokio::task::spawn_blocking(move || generator.generate(&prompt))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(crate::error::GenError::task(e.to_string())),
            });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenError;
    use crate::pipeline::coherence::{CoherenceIssue, IssueType, Severity};
    use crate::pipeline::correction::RederiveCorrector;
    use crate::project::model::{CharacterBrief, WorldConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn prompt() -> ParsedPrompt {
        ParsedPrompt::new("Neon Rain", "cyberpunk", "trailer", 60)
            .with_mood("dark")
            .with_setting("Neo Tokyo")
    }

    /// Counts how often it is invoked.
    #[derive(Default)]
    struct CountingCorrector(Arc<AtomicUsize>);

    impl AutoCorrector for CountingCorrector {
        fn correct(
            &self,
            components: ProjectComponents,
            _: &[CoherenceIssue],
        ) -> ProjectComponents {
            self.0.fetch_add(1, Ordering::SeqCst);
            components
        }
    }

    struct FixedWorld;

    impl WorldGenerator for FixedWorld {
        fn generate(&self, prompt: &ParsedPrompt) -> WorldConfig {
            WorldConfig {
                genre: prompt.genre.clone(),
                setting: "Fixed City".into(),
                lighting_style: "flat".into(),
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_generate_happy_path() {
        let components = ComponentGenerator::new().generate(&prompt()).unwrap();

        assert_eq!(components.metadata.name, "Neon Rain");
        assert_eq!(components.metadata.version, "1.0.0");
        assert_eq!(components.metadata.resolution, "1920x1080");
        assert_eq!(components.metadata.created_at, components.metadata.updated_at);
        assert_eq!(components.sequence_plan.sequences.len(), components.story.acts.len());
        assert!(components.coherence.is_coherent);
    }

    #[test]
    fn test_invalid_prompt_fails_fast() {
        let bad = ParsedPrompt::new("T", "drama", "trailer", 0);
        let err = ComponentGenerator::new().generate(&bad).unwrap_err();
        assert!(matches!(err, GenError::InvalidPrompt { .. }));

        let endless = ParsedPrompt::new("T", "drama", "trailer", u32::MAX);
        let err = ComponentGenerator::new().generate(&endless).unwrap_err();
        assert!(matches!(err, GenError::InvalidPrompt { .. }));
    }

    #[test]
    fn test_config_drives_metadata() {
        let config = GeneratorConfig::new()
            .with_version("2.1.0")
            .with_author("studio")
            .with_default_resolution("1280x720");
        let generator = ComponentGenerator::with_config(config);

        let vertical = generator.generate(&prompt().with_aspect_ratio("9:16")).unwrap();
        assert_eq!(vertical.metadata.resolution, "1080x1920");
        assert_eq!(vertical.metadata.author, "studio");
        assert_eq!(vertical.metadata.version, "2.1.0");

        let odd = generator.generate(&prompt().with_aspect_ratio("5:3")).unwrap();
        assert_eq!(odd.metadata.resolution, "1280x720");
    }

    #[test]
    fn test_custom_world_generator() {
        let generator = ComponentGenerator::new().with_world_generator(FixedWorld);
        let components = generator.generate(&prompt()).unwrap();
        assert_eq!(components.world.setting, "Fixed City");
        assert!(components.sequence_plan.sequences[0].shots[0]
            .lighting
            .starts_with("flat, "));
    }

    #[test]
    fn test_artifacts_deterministic() {
        let generator = ComponentGenerator::new();
        let p = prompt().with_character(CharacterBrief::new("Kai", "protagonist"));
        let a = generator.generate(&p).unwrap();
        let b = generator.generate(&p).unwrap();

        assert_ne!(a.metadata.id, b.metadata.id);
        assert_eq!(a.story, b.story);
        assert_eq!(a.dialogue, b.dialogue);
        assert_eq!(a.sequence_plan, b.sequence_plan);
        assert_eq!(a.music, b.music);
        assert_eq!(a.coherence, b.coherence);
    }

    #[test]
    fn test_corrector_skipped_when_coherent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator =
            ComponentGenerator::new().with_corrector(CountingCorrector(Arc::clone(&calls)));
        let components = generator.generate(&prompt()).unwrap();

        assert!(components.coherence.is_coherent);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    fn broken(generator: &ComponentGenerator) -> ProjectComponents {
        let mut components = generator.generate(&prompt()).unwrap();
        components.sequence_plan.sequences.pop();
        components
    }

    #[test]
    fn test_finalize_calls_corrector_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let generator =
            ComponentGenerator::new().with_corrector(CountingCorrector(Arc::clone(&calls)));
        let components = generator.finalize(broken(&generator));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!components.coherence.is_coherent);
    }

    #[test]
    fn test_finalize_keeps_unresolved_issues_visible() {
        let generator = ComponentGenerator::new();
        let components = generator.finalize(broken(&generator));

        assert!(!components.coherence.is_coherent);
        assert_eq!(components.coherence.total_issues, 1);
        let issue = &components.coherence.issues[0];
        assert_eq!(issue.issue_type, IssueType::SequenceActMismatch);
        assert_eq!(issue.severity, Severity::High);
    }

    #[test]
    fn test_finalize_respects_auto_correct_off() {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = GeneratorConfig::new().with_auto_correct(false);
        let generator = ComponentGenerator::with_config(config)
            .with_corrector(CountingCorrector(Arc::clone(&calls)));
        let components = generator.finalize(broken(&generator));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            components.coherence.issues_of(IssueType::SequenceActMismatch).count(),
            1
        );
    }

    #[test]
    fn test_finalize_with_rederive_repairs() {
        let generator = ComponentGenerator::new().with_corrector(RederiveCorrector::new());
        let expected = generator.generate(&prompt()).unwrap().sequence_plan;
        let components = generator.finalize(broken(&generator));

        assert!(components.coherence.is_coherent);
        assert_eq!(components.sequence_plan, expected);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_generate_batch_keeps_order() {
        let generator = std::sync::Arc::new(ComponentGenerator::new());
        let prompts = vec![
            prompt(),
            ParsedPrompt::new("Bad", "drama", "teaser", 0),
            ParsedPrompt::new("Ember", "fantasy", "teaser", 30),
        ];
        let results = generator.generate_batch(prompts).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().metadata.name, "Neon Rain");
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().story.acts.len(), 2);
    }
}
