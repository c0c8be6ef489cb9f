//! Error types for the lifto_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lifto_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A script line could not be parsed
    #[error("line {line}: {reason} near `{token}` in `{text}`")]
    PlanParse {
        line: usize,
        text: String,
        token: String,
        reason: String,
    },

    /// An exercise line appeared before any day header
    #[error("line {line}: exercise `{text}` appears before any `##` day header")]
    OrphanExercise { line: usize, text: String },

    /// A percent-based set under a category with no supplied max
    #[error("line {line}: percentage weight requires a {category} max, but none was supplied")]
    MissingMax { category: String, line: usize },

    /// Bad generation input (cycles, empty script, maxes)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Preset lookup failed
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// No upcoming rows carry this session number
    #[error("Session {0} not found")]
    SessionNotFound(u32),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upcoming workout store error
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Build a parse error for `token` on a script line.
    pub(crate) fn parse(
        line: usize,
        text: &str,
        token: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::PlanParse {
            line,
            text: text.to_string(),
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// The 1-based script line this error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::PlanParse { line, .. }
            | Error::OrphanExercise { line, .. }
            | Error::MissingMax { line, .. } => Some(*line),
            _ => None,
        }
    }
}
