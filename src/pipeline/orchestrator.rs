//! Per-recording pipeline orchestration.
//!
//! Runs the fixed stage sequence
//! `load → transcribe → align → diarize → label → materialize` for one
//! recording. The stages are strictly ordered and each gateway call owns its
//! model's lifecycle, so at most one heavy model is resident at any time —
//! an invariant, not an optimization: transcription, alignment, and
//! diarization models are each sized close to the whole accelerator.
//!
//! Failures in any stage abort this recording only. They are captured with
//! the stage name and returned inside a [`ProcessingOutcome`]; nothing
//! escapes past this boundary as `Err` or panic.

use log::{debug, error, info};
use std::path::Path;

use crate::artifacts;
use crate::audio;
use crate::error::Result;
use crate::pipeline::types::{ProcessingOutcome, Stage, StageFailure};
use crate::stt::gateway::{SpeakerBounds, SpeechModelGateway};
use crate::transcript::SpeakerMap;
use crate::turns;

pub struct PipelineOrchestrator<'a> {
    gateway: &'a dyn SpeechModelGateway,
    language: String,
    legacy_text: bool,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(gateway: &'a dyn SpeechModelGateway, language: impl Into<String>) -> Self {
        Self {
            gateway,
            language: language.into(),
            legacy_text: false,
        }
    }

    /// Additionally write the legacy header-stamped text artifact.
    pub fn with_legacy_text(mut self, enabled: bool) -> Self {
        self.legacy_text = enabled;
        self
    }

    /// Process one recording end to end.
    ///
    /// `speaker_count` is the resolved (or defaulted) speaker count, injected
    /// by the caller so this pipeline does not care whether it came from a
    /// metadata sidecar, an operator, or the policy default.
    pub fn process(
        &self,
        recording: &Path,
        speaker_count: u32,
        speaker_map: &SpeakerMap,
        output_dir: &Path,
    ) -> ProcessingOutcome {
        match self.run(recording, speaker_count, speaker_map, output_dir) {
            Ok(outputs) => {
                info!("Completed {}", recording.display());
                ProcessingOutcome::success(recording, outputs)
            }
            Err(failure) => {
                error!("{}: {}", recording.display(), failure);
                ProcessingOutcome::failure(recording, failure)
            }
        }
    }

    fn run(
        &self,
        recording: &Path,
        speaker_count: u32,
        speaker_map: &SpeakerMap,
        output_dir: &Path,
    ) -> std::result::Result<artifacts::OutputPaths, StageFailure> {
        let stem = recording
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let file_name = recording
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        debug!("Loading audio from {}", recording.display());
        let samples = stage(Stage::Load, audio::load_recording(recording))?;

        debug!("Transcribing {} ({} samples)", file_name, samples.len());
        let transcription = stage(Stage::Transcribe, self.gateway.transcribe(&samples))?;

        // Alignment follows the detected language when the ASR model reports
        // one; otherwise the configured language applies.
        let align_language = transcription
            .language
            .as_deref()
            .unwrap_or(&self.language)
            .to_string();
        debug!(
            "Aligning {} segments (language: {})",
            transcription.segments.len(),
            align_language
        );
        let segments = stage(
            Stage::Align,
            self.gateway
                .align(transcription.segments, &samples, &align_language),
        )?;

        debug!("Diarizing {} with exactly {} speakers", file_name, speaker_count);
        let intervals = stage(
            Stage::Diarize,
            self.gateway
                .diarize(&samples, SpeakerBounds::exact(speaker_count)),
        )?;

        let segments = stage(Stage::Label, self.gateway.assign_speakers(segments, &intervals))?;

        let conversation = turns::coalesce(&segments, speaker_map);
        let outputs = stage(
            Stage::Materialize,
            artifacts::materialize(&stem, &segments, &conversation, speaker_map, output_dir),
        )?;
        if self.legacy_text {
            stage(
                Stage::Materialize,
                artifacts::materialize_legacy_text(
                    &stem,
                    &file_name,
                    speaker_count,
                    &segments,
                    output_dir,
                ),
            )?;
        }

        Ok(outputs)
    }
}

/// Tag a stage result with its stage for failure reporting.
fn stage<T>(stage: Stage, result: Result<T>) -> std::result::Result<T, StageFailure> {
    result.map_err(|error| StageFailure { stage, error })
}
