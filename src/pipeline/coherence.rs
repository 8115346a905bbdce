//! Cross-artifact coherence validation.
//!
//! Validation never fails; it reports. Each check inspects one pair of
//! artifacts and returns the issues it found, tagged with a severity.

use autosurgeon::{Hydrate, Reconcile};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::project::model::ProjectComponents;

/// Kind of cross-artifact inconsistency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Reconcile, Hydrate, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// A dialogue scene id that is not one of the story's scene ids
    DialogueSceneMismatch,
    /// Sequence count differs from act count
    SequenceActMismatch,
    /// Music timeline has fewer cues than the story has acts
    MusicTimelineMismatch,
    /// Act durations drift from the requested duration
    DurationDrift,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DialogueSceneMismatch => "dialogue_scene_mismatch",
            Self::SequenceActMismatch => "sequence_act_mismatch",
            Self::MusicTimelineMismatch => "music_timeline_mismatch",
            Self::DurationDrift => "duration_drift",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Reconcile,
    Hydrate,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// One inconsistency found by [`validate_coherence`].
#[derive(Debug, Clone, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct CoherenceIssue {
    pub issue_type: IssueType,
    pub description: String,
    pub severity: Severity,
}

impl CoherenceIssue {
    pub fn new(issue_type: IssueType, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            issue_type,
            description: description.into(),
            severity,
        }
    }
}

/// Result of a coherence pass. `is_coherent` iff `issues` is empty.
#[derive(Debug, Clone, PartialEq, Reconcile, Hydrate, Serialize, Deserialize)]
pub struct CoherenceReport {
    pub is_coherent: bool,
    pub issues: Vec<CoherenceIssue>,
    pub total_issues: u32,
}

impl Default for CoherenceReport {
    fn default() -> Self {
        Self::from_issues(Vec::new())
    }
}

impl CoherenceReport {
    pub fn from_issues(issues: Vec<CoherenceIssue>) -> Self {
        Self {
            is_coherent: issues.is_empty(),
            total_issues: issues.len() as u32,
            issues,
        }
    }

    /// Issues of the given type.
    pub fn issues_of(&self, issue_type: IssueType) -> impl Iterator<Item = &CoherenceIssue> {
        self.issues.iter().filter(move |i| i.issue_type == issue_type)
    }

    /// Number of issues at the given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Highest severity present, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

type Check = fn(&ProjectComponents) -> Vec<CoherenceIssue>;

const CHECKS: &[(&str, Check)] = &[
    ("world_characters", check_world_characters),
    ("story_characters", check_story_characters),
    ("dialogue_story", check_dialogue_story),
    ("sequence_story", check_sequence_story),
    ("music_story", check_music_story),
    ("story_duration", check_story_duration),
];

/// Runs every check and collects the issues in check order.
#[tracing::instrument(skip_all, fields(project = %components.metadata.id))]
pub fn validate_coherence(components: &ProjectComponents) -> CoherenceReport {
    let mut issues = Vec::new();
    for (name, check) in CHECKS {
        let found = check(components);
        if !found.is_empty() {
            tracing::debug!(check = name, issues = found.len(), "Coherence check raised issues");
        }
        issues.extend(found);
    }

    let report = CoherenceReport::from_issues(issues);
    tracing::debug!(
        is_coherent = report.is_coherent,
        total_issues = report.total_issues,
        "Coherence validated"
    );
    report
}

// Advisory: characters are derived from the same prompt as the world, so
// there is nothing to compare yet.
fn check_world_characters(_components: &ProjectComponents) -> Vec<CoherenceIssue> {
    Vec::new()
}

// Advisory: the logline degrades gracefully without a cast.
fn check_story_characters(_components: &ProjectComponents) -> Vec<CoherenceIssue> {
    Vec::new()
}

fn check_dialogue_story(components: &ProjectComponents) -> Vec<CoherenceIssue> {
    let story_scenes = components.story.scene_ids();
    components
        .dialogue
        .scenes
        .iter()
        .filter(|scene| !story_scenes.contains(&scene.scene_id.as_str()))
        .map(|scene| {
            CoherenceIssue::new(
                IssueType::DialogueSceneMismatch,
                format!("Dialogue scene {} not found in story structure", scene.scene_id),
                Severity::Medium,
            )
        })
        .collect()
}

fn check_sequence_story(components: &ProjectComponents) -> Vec<CoherenceIssue> {
    let sequences = components.sequence_plan.sequences.len();
    let acts = components.story.acts.len();
    if sequences == acts {
        return Vec::new();
    }
    vec![CoherenceIssue::new(
        IssueType::SequenceActMismatch,
        format!("Sequence count ({}) doesn't match act count ({})", sequences, acts),
        Severity::High,
    )]
}

fn check_music_story(components: &ProjectComponents) -> Vec<CoherenceIssue> {
    let cues = components.music.timeline.len();
    let acts = components.story.acts.len();
    if cues >= acts {
        return Vec::new();
    }
    vec![CoherenceIssue::new(
        IssueType::MusicTimelineMismatch,
        format!("Music timeline has {} cues for {} acts", cues, acts),
        Severity::Low,
    )]
}

fn check_story_duration(components: &ProjectComponents) -> Vec<CoherenceIssue> {
    let requested = components.prompt.duration_seconds as i64;
    let actual = components.story.total_duration() as i64;
    let tolerance = components.story.acts.len() as i64;
    if (actual - requested).abs() <= tolerance {
        return Vec::new();
    }
    vec![CoherenceIssue::new(
        IssueType::DurationDrift,
        format!(
            "Acts total {}s but {}s was requested (tolerance {}s)",
            actual, requested, tolerance
        ),
        Severity::Medium,
    )]
}
