//! Default configuration constants for meetscribe.
//!
//! Shared constants used across configuration types and pipeline stages to
//! ensure consistency and eliminate duplication.

/// Audio sample rate in Hz that all model stages consume.
///
/// 16kHz mono is the standard input for both the Whisper ASR models and the
/// diarization models; every recording is downmixed/resampled to this on load.
pub const SAMPLE_RATE: u32 = 16000;

/// Default Whisper model name.
///
/// "large-v3" is the accuracy-first choice for unattended batch runs where
/// throughput matters less than transcript quality.
pub const DEFAULT_MODEL: &str = "large-v3";

/// Default language code for transcription.
///
/// Batch recordings in one deployment are normally in a single language, so
/// there is no per-file auto-detection; override in config for other corpora.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Speaker count assumed when no metadata sidecar can be resolved.
///
/// This is a policy fallback, not a discovered fact — the batch driver warns
/// whenever it is applied so the operator can tell defaulted files apart from
/// files with authoritative metadata.
pub const DEFAULT_SPEAKER_COUNT: u32 = 2;

/// Speaker label used for segments the diarizer could not attribute.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Prefix of raw diarization labels before name mapping.
///
/// Labels are `SPEAKER_1`, `SPEAKER_2`, ... with 1-based numbering so they
/// line up with the 1-based attendee ordinals in metadata sidecars.
pub const SPEAKER_LABEL_PREFIX: &str = "SPEAKER_";

/// File extensions (lowercase, no dot) scanned for recordings by default.
pub const RECORDING_EXTENSIONS: &[&str] = &["wav"];

/// Suffix appended to a recording stem to find its metadata sidecar.
pub const METADATA_SUFFIX: &str = "_metadata.json";

/// Similarity threshold for clustering speaker embeddings.
///
/// Segments whose embedding is at least this close to a known speaker are
/// assigned to it; below the threshold a new speaker is opened while the
/// requested count allows.
pub const SPEAKER_SIMILARITY_THRESHOLD: f32 = 0.5;
