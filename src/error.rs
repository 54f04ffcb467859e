//! Error taxonomy for keyword extraction
//!
//! Configuration, validation and shape failures are unrecoverable for the
//! current `add_text` call. Cancellation by a stage handler is not an error:
//! it is expressed through [`Flow::Stop`](crate::extension::Flow).

use crate::extension::Stage;
use thiserror::Error;

/// A pipeline binding is missing or unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("required extension point `{0}` has no handler")]
    MissingStage(Stage),

    #[error("extension point `ranking_class` did not produce a ranking algorithm")]
    NoRankingAlgorithm,

    #[error("unknown extension point: {0}")]
    UnknownStage(String),

    #[error("handler for `{handler}` cannot be bound to extension point `{name}`")]
    StageMismatch { name: String, handler: Stage },

    #[error("invalid cleaner alphabet `{alphabet}`: {reason}")]
    InvalidAlphabet { alphabet: String, reason: String },
}

/// A numeric parameter is outside its contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid damping factor {0}: must satisfy 0 < d <= 1")]
    InvalidDamping(f64),

    #[error("invalid convergence threshold {0}: must be finite and <= 1")]
    InvalidConvergence(f64),

    #[error("invalid iteration cap {0}: must be at least 1")]
    InvalidMaxIterations(usize),

    #[error("invalid co-occurrence window {0}: must be at least 1")]
    InvalidWindow(usize),
}

/// A stage produced a value of the wrong shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("extension point `{0}` did not produce a feature sequence")]
    NoFeatures(Stage),
}

/// Errors that can occur while extracting keywords
#[derive(Debug, Error)]
pub enum TermRankError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("handler error: {0}")]
    Handler(String),
}

impl TermRankError {
    /// Build an error from inside a user-supplied stage handler.
    pub fn handler(msg: impl Into<String>) -> Self {
        Self::Handler(msg.into())
    }
}

/// Result type for keyword extraction operations
pub type TermRankResult<T> = Result<T, TermRankError>;
