// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Engine error types.
///
/// Nothing here is fatal to the page: each error degrades a single element
/// (a reveal falls back to visible, a form shows its error status) while the
/// rest of the engines keep running.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid root margin '{0}': expected 1-4 px or % values")]
    InvalidRootMargin(String),

    #[error("Observation already {0}")]
    ObservationState(&'static str),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Boundary rejected submission ({status}): {message}")]
    Boundary { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
