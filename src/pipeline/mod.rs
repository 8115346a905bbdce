//! Orchestration: the [`ComponentGenerator`], cross-artifact coherence
//! validation and auto-correction.

pub mod coherence;
pub mod correction;
pub mod generator;

pub use coherence::{validate_coherence, CoherenceIssue, CoherenceReport, IssueType, Severity};
pub use correction::{AutoCorrector, NoopCorrector, RederiveCorrector};
pub use generator::ComponentGenerator;
