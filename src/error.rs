//! Error types for the lobby.

use crate::sequencer::phase::Phase;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Sequencer error: {0}")]
    Sequencer(#[from] SequencerError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors rejected at the landing-form boundary, before the sequencer is
/// ever involved.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Display name is empty")]
    EmptyName,

    #[error("Display name exceeds {max} characters")]
    NameTooLong { max: usize },

    #[error("Unknown game: {game}")]
    UnknownGame { game: String },
}

/// Onboarding sequencer errors.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    #[error("A sequence is already in flight (phase: {phase})")]
    AlreadyRunning { phase: Phase },

    #[error("Operation requires phase {expected}, but sequencer is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("Sequencer has been disposed")]
    Disposed,
}

/// Assistant upstream errors. These never escape `PitBoss::respond` — the
/// caller always receives a reply string.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Upstream request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Invalid response from upstream: {reason}")]
    InvalidResponse { reason: String },

    #[error("No API credentials configured")]
    MissingCredentials,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the lobby.
pub type Result<T> = std::result::Result<T, Error>;
