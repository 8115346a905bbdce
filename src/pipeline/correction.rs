//! Auto-correction strategies invoked when coherence validation finds
//! issues.
//!
//! The orchestrator re-validates whatever a corrector returns, so a
//! corrector may fix some issues, all of them, or none.

use crate::generators::{
    DialogueScriptGenerator, MusicDescriptionGenerator, SequencePlanner, StoryStructureGenerator,
};
use crate::pipeline::coherence::{CoherenceIssue, IssueType};
use crate::project::model::ProjectComponents;

/// Repairs components given the issues found on them.
pub trait AutoCorrector: Send + Sync {
    fn correct(
        &self,
        components: ProjectComponents,
        issues: &[CoherenceIssue],
    ) -> ProjectComponents;
}

/// Returns the components unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCorrector;

impl AutoCorrector for NoopCorrector {
    fn correct(
        &self,
        components: ProjectComponents,
        issues: &[CoherenceIssue],
    ) -> ProjectComponents {
        tracing::debug!(issues = issues.len(), "No-op corrector leaves issues in place");
        components
    }
}

/// Re-derives the mismatched artifact, and everything generated after it,
/// with the default generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct RederiveCorrector;

impl RederiveCorrector {
    pub fn new() -> Self {
        Self
    }
}

/// Generation order; re-deriving a stage re-derives every later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stage {
    Story,
    Dialogue,
    Sequence,
    Music,
}

impl Stage {
    fn for_issue(issue_type: IssueType) -> Self {
        match issue_type {
            IssueType::DurationDrift => Self::Story,
            IssueType::DialogueSceneMismatch => Self::Dialogue,
            IssueType::SequenceActMismatch => Self::Sequence,
            IssueType::MusicTimelineMismatch => Self::Music,
        }
    }
}

impl AutoCorrector for RederiveCorrector {
    #[tracing::instrument(skip_all, fields(issues = issues.len()))]
    fn correct(
        &self,
        mut components: ProjectComponents,
        issues: &[CoherenceIssue],
    ) -> ProjectComponents {
        let Some(from) = issues.iter().map(|i| Stage::for_issue(i.issue_type)).min() else {
            return components;
        };
        tracing::info!(from = ?from, "Re-deriving components");

        let c = &mut components;
        if from <= Stage::Story {
            c.story = StoryStructureGenerator::new().generate(&c.prompt, &c.world, &c.characters);
        }
        if from <= Stage::Dialogue {
            c.dialogue =
                DialogueScriptGenerator::new().generate(&c.prompt, &c.story, &c.characters);
        }
        if from <= Stage::Sequence {
            c.sequence_plan =
                SequencePlanner::new().generate(&c.prompt, &c.story, &c.dialogue, &c.world);
        }
        c.music = MusicDescriptionGenerator::new().generate(&c.prompt, &c.story);

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::coherence::{validate_coherence, Severity};
    use crate::pipeline::ComponentGenerator;
    use crate::project::model::ParsedPrompt;

    fn generated() -> ProjectComponents {
        let prompt = ParsedPrompt::new("T", "drama", "short_film", 120).with_setting("Harbor");
        ComponentGenerator::new().generate(&prompt).unwrap()
    }

    fn issue(issue_type: IssueType) -> CoherenceIssue {
        CoherenceIssue::new(issue_type, "test", Severity::High)
    }

    #[test]
    fn test_noop_returns_input() {
        let mut components = generated();
        components.sequence_plan.sequences.pop();
        let issues = [issue(IssueType::SequenceActMismatch)];
        let out = NoopCorrector.correct(components.clone(), &issues);
        assert_eq!(out, components);
    }

    #[test]
    fn test_rederive_without_issues_is_identity() {
        let components = generated();
        assert_eq!(RederiveCorrector::new().correct(components.clone(), &[]), components);
    }

    #[test]
    fn test_rederive_sequence_plan() {
        let original = generated();
        let mut broken = original.clone();
        broken.sequence_plan.sequences.pop();

        let fixed = RederiveCorrector::new()
            .correct(broken, &[issue(IssueType::SequenceActMismatch)]);
        assert_eq!(fixed.sequence_plan, original.sequence_plan);
        assert!(validate_coherence(&fixed).is_coherent);
    }

    #[test]
    fn test_rederive_dialogue_and_music() {
        let original = generated();
        let mut broken = original.clone();
        broken.dialogue.scenes[0].scene_id = "scene-x".into();
        broken.music.timeline.clear();

        let fixed = RederiveCorrector::new().correct(
            broken,
            &[
                issue(IssueType::MusicTimelineMismatch),
                issue(IssueType::DialogueSceneMismatch),
            ],
        );
        assert_eq!(fixed.dialogue, original.dialogue);
        assert_eq!(fixed.music, original.music);
    }

    #[test]
    fn test_rederive_story_on_drift() {
        let original = generated();
        let mut broken = original.clone();
        broken.story.acts[1].duration = 5;

        let fixed = RederiveCorrector::new().correct(broken, &[issue(IssueType::DurationDrift)]);
        assert_eq!(fixed.story, original.story);
        assert!(validate_coherence(&fixed).is_coherent);
    }
}
