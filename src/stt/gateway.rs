//! The capability trait the pipeline consumes for all model inference.

use crate::error::{MeetscribeError, Result};
use crate::stt::assign;
use crate::transcript::{Segment, SpeakerInterval};

use crate::defaults::SAMPLE_RATE;

/// Transcription stage output: raw segments plus the language the ASR model
/// detected, when it reports one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub segments: Vec<Segment>,
    pub language: Option<String>,
}

/// Speaker count bounds passed to diarization.
///
/// The pipeline always uses exact bounds (`min == max`): the resolved speaker
/// count is treated as ground truth, not a search range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerBounds {
    pub min: u32,
    pub max: u32,
}

impl SpeakerBounds {
    pub fn exact(count: u32) -> Self {
        Self {
            min: count,
            max: count,
        }
    }
}

/// Opaque boundary to the speech models.
///
/// Contract: every method owns the full lifecycle of whatever model it needs —
/// load, run, release — within the call. The orchestrator sequences calls
/// strictly, so this contract guarantees at most one heavy model is resident
/// at any time. Calls block until inference completes; no timeout is imposed.
pub trait SpeechModelGateway: Send + Sync {
    /// Run ASR over mono 16kHz samples, producing unlabeled segments in
    /// start-time order.
    fn transcribe(&self, audio: &[i16]) -> Result<Transcription>;

    /// Refine segment timing against the audio, keyed by language.
    fn align(&self, segments: Vec<Segment>, audio: &[i16], language: &str) -> Result<Vec<Segment>>;

    /// Partition the audio into speaker-attributed time intervals.
    fn diarize(&self, audio: &[i16], bounds: SpeakerBounds) -> Result<Vec<SpeakerInterval>>;

    /// Merge diarized intervals onto segments by temporal overlap.
    fn assign_speakers(
        &self,
        segments: Vec<Segment>,
        intervals: &[SpeakerInterval],
    ) -> Result<Vec<Segment>> {
        Ok(assign::assign_by_overlap(segments, intervals))
    }
}

/// Mock gateway for testing.
///
/// Returns canned segments and intervals, and can be configured to fail at
/// individual stages — either unconditionally or, for the align stage, only
/// for audio longer than a threshold (which lets a batch test fail one
/// engineered recording while its neighbors succeed).
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    segments: Vec<Segment>,
    intervals: Vec<SpeakerInterval>,
    language: Option<String>,
    fail_transcribe: bool,
    fail_align: bool,
    fail_diarize: bool,
    align_failure_over_secs: Option<f64>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned transcription segments.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Canned diarization intervals.
    pub fn with_intervals(mut self, intervals: Vec<SpeakerInterval>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Report a detected language from the transcribe stage.
    pub fn with_detected_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_transcribe_failure(mut self) -> Self {
        self.fail_transcribe = true;
        self
    }

    pub fn with_align_failure(mut self) -> Self {
        self.fail_align = true;
        self
    }

    pub fn with_diarize_failure(mut self) -> Self {
        self.fail_diarize = true;
        self
    }

    /// Fail the align stage only for audio longer than `secs`.
    pub fn with_align_failure_over_secs(mut self, secs: f64) -> Self {
        self.align_failure_over_secs = Some(secs);
        self
    }
}

impl SpeechModelGateway for MockGateway {
    fn transcribe(&self, _audio: &[i16]) -> Result<Transcription> {
        if self.fail_transcribe {
            return Err(MeetscribeError::Transcription {
                message: "mock transcription failure".to_string(),
            });
        }
        Ok(Transcription {
            segments: self.segments.clone(),
            language: self.language.clone(),
        })
    }

    fn align(&self, segments: Vec<Segment>, audio: &[i16], _language: &str) -> Result<Vec<Segment>> {
        if self.fail_align {
            return Err(MeetscribeError::Alignment {
                message: "mock alignment failure".to_string(),
            });
        }
        if let Some(limit) = self.align_failure_over_secs {
            let duration = audio.len() as f64 / SAMPLE_RATE as f64;
            if duration > limit {
                return Err(MeetscribeError::Alignment {
                    message: format!("mock alignment failure for {:.1}s audio", duration),
                });
            }
        }
        Ok(segments)
    }

    fn diarize(&self, _audio: &[i16], _bounds: SpeakerBounds) -> Result<Vec<SpeakerInterval>> {
        if self.fail_diarize {
            return Err(MeetscribeError::Diarization {
                message: "mock diarization failure".to_string(),
            });
        }
        Ok(self.intervals.clone())
    }
}
