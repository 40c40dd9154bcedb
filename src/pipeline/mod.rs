//! The per-recording processing pipeline and the batch driver around it.

pub mod batch;
pub mod orchestrator;
pub mod types;

pub use batch::{BatchConfig, BatchDriver, discover_recordings};
pub use orchestrator::PipelineOrchestrator;
pub use types::{BatchSummary, ProcessingOutcome, Stage, StageFailure};
