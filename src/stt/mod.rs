//! Speech model boundary: ASR, alignment, diarization, speaker assignment.
//!
//! The pipeline only ever talks to [`gateway::SpeechModelGateway`]; how
//! inference actually happens (native whisper.cpp binding, ONNX diarization
//! models, or a mock in tests) is an implementation detail behind that trait.

pub mod align;
pub mod assign;
pub mod gateway;
pub mod whisper;
