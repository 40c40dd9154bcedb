//! Error types for meetscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Input directory not found: {path}")]
    InputDirNotFound { path: String },

    #[error("No recordings found under {path}")]
    NoRecordingsFound { path: String },

    // Audio loading errors
    #[error("Failed to load audio: {message}")]
    AudioLoad { message: String },

    #[error("Recording contains no audio samples: {path}")]
    EmptyAudio { path: String },

    // Model stage errors
    #[error("Model not found at {path}")]
    ModelNotFound { path: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Alignment failed: {message}")]
    Alignment { message: String },

    #[error("Diarization failed: {message}")]
    Diarization { message: String },

    // Metadata errors (swallowed during resolution, surfaced in logs)
    #[error("Invalid metadata at {path}: {message}")]
    MetadataInvalid { path: String, message: String },

    // Output errors
    #[error("Failed to write {path}: {message}")]
    OutputWrite { path: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, MeetscribeError>;
