//! Whisper-backed implementation of the speech model gateway.
//!
//! ASR runs through whisper-rs (whisper.cpp); diarization runs through
//! pyannote-rs (segmentation + speaker-embedding ONNX models). Each stage
//! loads its model inside the call and drops it before returning, so the
//! orchestrator's one-heavy-model-at-a-time invariant holds by construction —
//! the same discipline whisper.cpp deployments use on memory-constrained
//! accelerators.
//!
//! # Feature Gates
//!
//! Transcription requires the `whisper` feature (and cmake to build);
//! diarization requires the `diarization` feature. Without them the
//! corresponding stage returns a descriptive error.

use std::path::PathBuf;

use crate::defaults;
use crate::error::{MeetscribeError, Result};
use crate::stt::align;
use crate::stt::gateway::{SpeakerBounds, SpeechModelGateway, Transcription};
use crate::transcript::{Segment, SpeakerInterval};

#[cfg(feature = "whisper")]
use std::sync::Once;
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the whisper-backed gateway.
#[derive(Debug, Clone)]
pub struct WhisperGatewayConfig {
    /// Path to the Whisper GGML model file
    pub asr_model: PathBuf,
    /// Language code for transcription (e.g. "en")
    pub language: String,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
    /// Path to the diarization segmentation ONNX model
    pub segmentation_model: PathBuf,
    /// Path to the speaker embedding ONNX model
    pub embedding_model: PathBuf,
    /// Embedding similarity threshold for speaker clustering
    pub similarity_threshold: f32,
}

impl Default for WhisperGatewayConfig {
    fn default() -> Self {
        Self {
            asr_model: PathBuf::new(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
            segmentation_model: PathBuf::new(),
            embedding_model: PathBuf::new(),
            similarity_threshold: defaults::SPEAKER_SIMILARITY_THRESHOLD,
        }
    }
}

/// Speech model gateway backed by whisper.cpp and pyannote ONNX models.
#[derive(Debug)]
pub struct WhisperGateway {
    config: WhisperGatewayConfig,
}

impl WhisperGateway {
    /// Create a gateway. Model files are validated here so a missing model
    /// fails the batch up front rather than on the first recording.
    pub fn new(config: WhisperGatewayConfig) -> Result<Self> {
        #[cfg(feature = "whisper")]
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            // Route whisper.cpp's noisy stderr output through the log crate.
            install_logging_hooks();
        });

        if !config.asr_model.exists() {
            return Err(MeetscribeError::ModelNotFound {
                path: config.asr_model.to_string_lossy().to_string(),
            });
        }
        if cfg!(feature = "diarization") {
            for model in [&config.segmentation_model, &config.embedding_model] {
                if !model.exists() {
                    return Err(MeetscribeError::ModelNotFound {
                        path: model.to_string_lossy().to_string(),
                    });
                }
            }
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &WhisperGatewayConfig {
        &self.config
    }

    /// Convert i16 PCM to the normalized f32 samples Whisper expects.
    pub fn convert_audio(samples: &[i16]) -> Vec<f32> {
        samples
            .iter()
            .map(|&sample| sample as f32 / 32768.0)
            .collect()
    }
}

#[cfg(feature = "whisper")]
impl WhisperGateway {
    fn run_whisper(&self, audio: &[i16]) -> Result<Transcription> {
        let audio_f32 = Self::convert_audio(audio);

        // Model lifetime is this call: loaded here, dropped at the end so the
        // alignment and diarization stages never share memory with it.
        let context = WhisperContext::new_with_params(
            self.config.asr_model.to_str().ok_or_else(|| {
                MeetscribeError::Transcription {
                    message: "Invalid UTF-8 in model path".to_string(),
                }
            })?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| MeetscribeError::Transcription {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        let mut state = context
            .create_state()
            .map_err(|e| MeetscribeError::Transcription {
                message: format!("Failed to create Whisper state: {}", e),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));
        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &audio_f32)
            .map_err(|e| MeetscribeError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let lang_id = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(lang_id)
            .map(str::to_string)
            .filter(|l| !l.is_empty());

        // Whisper timestamps are in centiseconds.
        let segments = state
            .as_iter()
            .map(|segment| Segment::new(
                segment.start_timestamp() as f64 / 100.0,
                segment.end_timestamp() as f64 / 100.0,
                segment.to_string().trim(),
            ))
            .filter(|segment| !segment.text.is_empty())
            .collect();

        Ok(Transcription { segments, language })
    }
}

#[cfg(feature = "diarization")]
impl WhisperGateway {
    fn run_diarization(
        &self,
        audio: &[i16],
        bounds: SpeakerBounds,
    ) -> Result<Vec<SpeakerInterval>> {
        use pyannote_rs::{EmbeddingExtractor, EmbeddingManager, get_segments};

        let diarize_err = |message: String| MeetscribeError::Diarization { message };

        // Both ONNX models live only for this call.
        let mut extractor = EmbeddingExtractor::new(&self.config.embedding_model)
            .map_err(|e| diarize_err(format!("Failed to load embedding model: {}", e)))?;
        // Capacity is the exact speaker count: once full, further segments are
        // matched to the closest existing speaker instead of opening new ones.
        let mut manager = EmbeddingManager::new(bounds.max as usize);

        let speech_segments =
            get_segments(audio, defaults::SAMPLE_RATE, &self.config.segmentation_model)
                .map_err(|e| diarize_err(format!("Segmentation failed: {}", e)))?;

        let mut intervals = Vec::new();
        for segment in speech_segments {
            let segment = match segment {
                Ok(segment) => segment,
                Err(e) => {
                    log::warn!("Skipping undecodable speech segment: {}", e);
                    continue;
                }
            };

            let embedding: Vec<f32> = match extractor.compute(&segment.samples) {
                Ok(values) => values.collect(),
                Err(e) => {
                    log::warn!(
                        "Skipping segment at {:.2}s, embedding failed: {}",
                        segment.start,
                        e
                    );
                    continue;
                }
            };

            let speaker_idx = manager
                .search_speaker(embedding.clone(), self.config.similarity_threshold)
                .map(Ok)
                .unwrap_or_else(|| {
                    manager
                        .get_best_speaker_match(embedding)
                        .map_err(|e| diarize_err(format!("Speaker match failed: {}", e)))
                })?;

            intervals.push(SpeakerInterval {
                start: segment.start,
                end: segment.end,
                speaker: format!("{}{}", defaults::SPEAKER_LABEL_PREFIX, speaker_idx + 1),
            });
        }

        Ok(intervals)
    }
}

impl SpeechModelGateway for WhisperGateway {
    #[cfg(feature = "whisper")]
    fn transcribe(&self, audio: &[i16]) -> Result<Transcription> {
        self.run_whisper(audio)
    }

    #[cfg(not(feature = "whisper"))]
    fn transcribe(&self, _audio: &[i16]) -> Result<Transcription> {
        Err(MeetscribeError::Transcription {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release (whisper is enabled by default)\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn align(&self, segments: Vec<Segment>, audio: &[i16], _language: &str) -> Result<Vec<Segment>> {
        Ok(align::refine_boundaries(segments, audio))
    }

    #[cfg(feature = "diarization")]
    fn diarize(&self, audio: &[i16], bounds: SpeakerBounds) -> Result<Vec<SpeakerInterval>> {
        self.run_diarization(audio, bounds)
    }

    #[cfg(not(feature = "diarization"))]
    fn diarize(&self, _audio: &[i16], _bounds: SpeakerBounds) -> Result<Vec<SpeakerInterval>> {
        Err(MeetscribeError::Diarization {
            message: "Diarization feature not enabled. Rebuild with --features diarization."
                .to_string(),
        })
    }
}
