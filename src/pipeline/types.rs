//! Outcome types produced by the pipeline and aggregated by the batch driver.

use std::path::{Path, PathBuf};

use crate::artifacts::OutputPaths;
use crate::error::MeetscribeError;

/// Pipeline stages, in their mandatory execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Transcribe,
    Align,
    Diarize,
    Label,
    Materialize,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Transcribe => "transcribe",
            Stage::Align => "align",
            Stage::Diarize => "diarize",
            Stage::Label => "label",
            Stage::Materialize => "materialize",
        };
        f.write_str(name)
    }
}

/// A stage error captured at the orchestrator boundary.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub error: MeetscribeError,
}

impl std::fmt::Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.error)
    }
}

/// Result of processing one recording. Failures never propagate past the
/// orchestrator; they travel in this value instead.
#[derive(Debug)]
pub struct ProcessingOutcome {
    pub recording: PathBuf,
    pub succeeded: bool,
    pub outputs: Option<OutputPaths>,
    pub error: Option<StageFailure>,
}

impl ProcessingOutcome {
    pub fn success(recording: &Path, outputs: OutputPaths) -> Self {
        Self {
            recording: recording.to_path_buf(),
            succeeded: true,
            outputs: Some(outputs),
            error: None,
        }
    }

    pub fn failure(recording: &Path, failure: StageFailure) -> Self {
        Self {
            recording: recording.to_path_buf(),
            succeeded: false,
            outputs: None,
            error: Some(failure),
        }
    }
}

/// Aggregated counts for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ProcessingOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }

    /// Success rate in percent, rounded to one decimal. Zero total yields
    /// 0.0 rather than dividing; callers report "no recordings found" before
    /// ever rendering that case.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64 * 1000.0).round() / 10.0
    }
}
