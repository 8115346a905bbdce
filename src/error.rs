//! Error types for the project generation pipeline.

use thiserror::Error;

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;

/// Errors that can occur while generating or storing a project.
///
/// Coherence problems between artifacts are not errors; they are reported
/// through [`crate::pipeline::CoherenceReport`].
#[derive(Error, Debug)]
pub enum GenError {
    /// The parsed prompt is malformed and the pipeline cannot start.
    #[error("Invalid prompt field `{field}`: {reason}")]
    InvalidPrompt { field: String, reason: String },

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Automerge error during document operations.
    #[error("Automerge error: {0}")]
    Automerge(#[from] automerge::AutomergeError),

    /// Autosurgeon hydration error.
    #[error("Hydration error: {0}")]
    Hydrate(#[from] autosurgeon::HydrateError),

    /// Autosurgeon reconcile error.
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] autosurgeon::ReconcileError),

    /// A path inside the project document does not exist.
    #[error("Document path not found: {0}")]
    PathNotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A background generation task panicked or was cancelled.
    #[error("Task error: {0}")]
    Task(String),
}

impl GenError {
    /// Creates an InvalidPrompt error.
    pub fn invalid_prompt(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPrompt {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a PathNotFound error.
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a Task error.
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
