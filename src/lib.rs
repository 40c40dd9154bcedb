//! meetscribe - Batch speaker-attributed transcription for recorded meetings
//!
//! Turns a directory of meeting recordings into speaker-attributed
//! transcripts: ASR, timing alignment, diarization with an exact speaker
//! count from metadata sidecars, and three output artifacts per recording.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod artifacts;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod metadata;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod stt;
pub mod sys;
pub mod transcript;
pub mod turns;

// Core data model
pub use transcript::{ConversationTurn, Segment, SpeakerInterval, SpeakerMap};

// Model boundary (source → segments → labels)
pub use stt::gateway::{MockGateway, SpeakerBounds, SpeechModelGateway, Transcription};

// Pipeline
pub use pipeline::{BatchConfig, BatchDriver, BatchSummary, PipelineOrchestrator, ProcessingOutcome};

// Error handling
pub use error::{MeetscribeError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
