//! Error types for soundboard-core.

use thiserror::Error;

/// Main error type for the soundboard-core library.
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to load board '{0}': {1}")]
    ConfigLoad(String, String),

    #[error("Failed to parse board '{0}': {1}")]
    ConfigParse(String, String),

    #[error("Board validation error in '{0}': {1}")]
    ConfigValidation(String, String),

    // Playback errors
    #[error("Sound id cannot be empty")]
    EmptySoundId,

    #[error("No audio output device available")]
    NoAudioPlayer,

    #[error("Failed to start playback: {0}")]
    StartFailed(String),

    #[error("Failed to halt playback: {0}")]
    TeardownFailed(String),

    // Generic errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
