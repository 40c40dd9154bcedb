use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::Result;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub transcription: TranscriptionConfig,
    pub diarization: DiarizationConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

/// Transcription (ASR) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub model: String,
    /// Explicit model file path; overrides the managed model cache.
    pub model_path: Option<PathBuf>,
    pub language: String,
    pub threads: Option<usize>,
}

/// Diarization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiarizationConfig {
    /// Segmentation model path; empty means "use the managed model cache".
    pub segmentation_model: Option<PathBuf>,
    /// Speaker embedding model path; empty means "use the managed model cache".
    pub embedding_model: Option<PathBuf>,
    pub similarity_threshold: f32,
    pub default_speaker_count: u32,
}

/// Recording discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub recursive: bool,
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Base directory for outputs; `None` means `<input>/transcripts`.
    pub base_dir: Option<PathBuf>,
    /// Also write the legacy header-stamped whole-file transcript.
    pub legacy_text: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            model_path: None,
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            segmentation_model: None,
            embedding_model: None,
            similarity_threshold: defaults::SPEAKER_SIMILARITY_THRESHOLD,
            default_speaker_count: defaults::DEFAULT_SPEAKER_COUNT,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: defaults::RECORDING_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            recursive: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            legacy_text: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file is missing or contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't
    /// exist. Invalid TOML in an existing file is still an error — silently
    /// ignoring a broken config would mask operator mistakes.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MEETSCRIBE_MODEL → transcription.model
    /// - MEETSCRIBE_LANGUAGE → transcription.language
    /// - MEETSCRIBE_OUTPUT_DIR → output.base_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("MEETSCRIBE_MODEL")
            && !model.is_empty()
        {
            self.transcription.model = model;
        }

        if let Ok(language) = std::env::var("MEETSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.transcription.language = language;
        }

        if let Ok(dir) = std::env::var("MEETSCRIBE_OUTPUT_DIR")
            && !dir.is_empty()
        {
            self.output.base_dir = Some(PathBuf::from(dir));
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/meetscribe/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetscribe")
            .join("config.toml")
    }
}
