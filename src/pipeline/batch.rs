//! Batch driver: process every recording under a directory.
//!
//! Recordings are discovered by extension (flat or recursive), sorted for
//! deterministic processing order, and run through the pipeline one at a
//! time — the accelerator is exclusively owned, so there is no overlap
//! between recordings. One recording's failure never stops the batch; an
//! operator interrupt is honored between recordings and still yields the
//! partial outcome list for everything already completed.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::defaults;
use crate::error::{MeetscribeError, Result};
use crate::metadata::MetadataResolver;
use crate::naming;
use crate::pipeline::orchestrator::PipelineOrchestrator;
use crate::pipeline::types::ProcessingOutcome;
use crate::stt::gateway::SpeechModelGateway;
use crate::transcript::SpeakerMap;

/// Everything a batch run needs, passed in explicitly at construction —
/// there is no ambient process state to configure.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for recordings; also the workspace root of the
    /// metadata resolution chain.
    pub input_dir: PathBuf,
    /// Directory under which per-recording output directories are created.
    pub output_base: PathBuf,
    /// Scan the whole tree instead of just the top level.
    pub recursive: bool,
    /// Lowercase extensions (without dot) that count as recordings.
    pub extensions: Vec<String>,
    /// Language for transcription/alignment.
    pub language: String,
    /// Speaker count applied when no metadata resolves.
    pub default_speaker_count: u32,
    /// Also write the legacy header-stamped text artifact.
    pub legacy_text: bool,
    /// Suppress per-file status lines on stdout.
    pub quiet: bool,
}

impl BatchConfig {
    /// Sensible defaults for a given input directory: outputs under
    /// `<input>/transcripts`, flat scan, WAV only.
    pub fn for_input_dir(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let output_base = input_dir.join("transcripts");
        Self {
            input_dir,
            output_base,
            recursive: false,
            extensions: defaults::RECORDING_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            default_speaker_count: defaults::DEFAULT_SPEAKER_COUNT,
            legacy_text: false,
            quiet: false,
        }
    }
}

/// Enumerate recordings under `dir`, sorted by path for determinism.
pub fn discover_recordings(dir: &Path, extensions: &[String], recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MeetscribeError::InputDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut recordings = Vec::new();
    collect(dir, extensions, recursive, &mut recordings)?;
    recordings.sort();
    Ok(recordings)
}

fn collect(
    dir: &Path,
    extensions: &[String],
    recursive: bool,
    recordings: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                collect(&path, extensions, recursive, recordings)?;
            }
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(e)));
        if matches {
            recordings.push(path);
        }
    }
    Ok(())
}

pub struct BatchDriver<'a> {
    config: BatchConfig,
    gateway: &'a dyn SpeechModelGateway,
    interrupt: Arc<AtomicBool>,
}

impl<'a> BatchDriver<'a> {
    pub fn new(config: BatchConfig, gateway: &'a dyn SpeechModelGateway) -> Self {
        Self {
            config,
            gateway,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an interrupt flag (set from a signal handler) that stops the
    /// batch between recordings.
    pub fn with_interrupt(mut self, interrupt: Arc<AtomicBool>) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Run the batch. Fatal setup conditions (missing input directory, no
    /// recordings at all) return `Err`; everything after that is captured
    /// per recording in the returned outcomes.
    pub fn run(&self) -> Result<Vec<ProcessingOutcome>> {
        let recordings = discover_recordings(
            &self.config.input_dir,
            &self.config.extensions,
            self.config.recursive,
        )?;
        if recordings.is_empty() {
            return Err(MeetscribeError::NoRecordingsFound {
                path: self.config.input_dir.display().to_string(),
            });
        }

        info!(
            "Found {} recordings under {}",
            recordings.len(),
            self.config.input_dir.display()
        );

        let resolver = MetadataResolver::new(&self.config.input_dir, &self.config.output_base);
        let orchestrator = PipelineOrchestrator::new(self.gateway, &self.config.language)
            .with_legacy_text(self.config.legacy_text);

        let total = recordings.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, recording) in recordings.iter().enumerate() {
            if self.interrupt.load(Ordering::SeqCst) {
                warn!(
                    "Interrupted after {} of {} recordings; stopping",
                    outcomes.len(),
                    total
                );
                if !self.config.quiet {
                    println!("Interrupted; reporting partial results.");
                }
                break;
            }

            let file_name = recording.file_name().unwrap_or_default().to_string_lossy();
            if !self.config.quiet {
                println!("[{}/{}] Processing {}", index + 1, total, file_name);
            }

            let stem = recording
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let output_dir = self
                .config
                .output_base
                .join(naming::output_directory_name(&stem));

            let (speaker_count, speaker_map) = self.resolve_speakers(recording, &resolver);

            let outcome = orchestrator.process(recording, speaker_count, &speaker_map, &output_dir);
            if !self.config.quiet {
                match &outcome.error {
                    None => println!("  done -> {}", output_dir.display()),
                    Some(failure) => println!("  FAILED ({})", failure),
                }
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Resolve the speaker count and name map for one recording, applying
    /// the documented default when no metadata is found. The default is
    /// surfaced loudly: it is a guess, not ground truth.
    fn resolve_speakers(
        &self,
        recording: &Path,
        resolver: &MetadataResolver,
    ) -> (u32, SpeakerMap) {
        match resolver.resolve(recording) {
            (Some(metadata), location) => {
                if !self.config.quiet {
                    if let Some(location) = &location {
                        println!("  metadata: {} ({} speakers)", location.display(), metadata.speaker_count);
                    }
                    for attendee in &metadata.attendees {
                        println!("    - {}", attendee.name);
                    }
                }
                let map = SpeakerMap::from_attendees(&metadata.attendees);
                (metadata.speaker_count, map)
            }
            (None, _) => {
                warn!(
                    "No metadata for {}; assuming default of {} speakers",
                    recording.display(),
                    self.config.default_speaker_count
                );
                if !self.config.quiet {
                    println!(
                        "  no metadata found, assuming {} speakers",
                        self.config.default_speaker_count
                    );
                }
                (self.config.default_speaker_count, SpeakerMap::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stt::gateway::MockGateway;
    use crate::transcript::{Segment, SpeakerInterval};
    use tempfile::TempDir;

    fn write_wav(path: &Path, secs: usize) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(16000 * secs) {
            writer.write_sample(((i % 80) as i16) * 100).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn canned_gateway() -> MockGateway {
        MockGateway::new()
            .with_segments(vec![Segment::new(0.0, 1.0, "hello")])
            .with_intervals(vec![SpeakerInterval {
                start: 0.0,
                end: 1.0,
                speaker: "SPEAKER_1".to_string(),
            }])
    }

    fn quiet_config(input: &Path) -> BatchConfig {
        let mut config = BatchConfig::for_input_dir(input);
        config.quiet = true;
        config
    }

    #[test]
    fn discovery_is_sorted_and_extension_filtered() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("b.wav"), b"x").unwrap();
        std::fs::write(tmp.path().join("a.wav"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let found =
            discover_recordings(tmp.path(), &["wav".to_string()], false).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.wav"]);
    }

    #[test]
    fn discovery_flat_ignores_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("nested.wav"), b"x").unwrap();
        std::fs::write(tmp.path().join("top.wav"), b"x").unwrap();

        let found = discover_recordings(tmp.path(), &["wav".to_string()], false).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn discovery_recursive_walks_tree() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("a/b");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("deep.wav"), b"x").unwrap();
        std::fs::write(tmp.path().join("top.WAV"), b"x").unwrap();

        let found = discover_recordings(tmp.path(), &["wav".to_string()], true).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn missing_input_dir_is_fatal() {
        let result = discover_recordings(Path::new("/nonexistent/input"), &["wav".to_string()], false);
        assert!(matches!(result, Err(MeetscribeError::InputDirNotFound { .. })));
    }

    #[test]
    fn empty_input_dir_yields_no_recordings_error() {
        let tmp = TempDir::new().unwrap();
        let gateway = canned_gateway();
        let driver = BatchDriver::new(quiet_config(tmp.path()), &gateway);
        assert!(matches!(
            driver.run(),
            Err(MeetscribeError::NoRecordingsFound { .. })
        ));
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let tmp = TempDir::new().unwrap();
        // Recording 2 is longer than the mock's align threshold; 1 and 3 pass.
        write_wav(&tmp.path().join("rec1.wav"), 1);
        write_wav(&tmp.path().join("rec2.wav"), 5);
        write_wav(&tmp.path().join("rec3.wav"), 1);

        let gateway = canned_gateway().with_align_failure_over_secs(3.0);
        let driver = BatchDriver::new(quiet_config(tmp.path()), &gateway);
        let outcomes = driver.run().unwrap();

        let summary = crate::pipeline::types::BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].recording.ends_with("rec2.wav"));
    }

    #[test]
    fn outputs_land_in_per_recording_directories() {
        let tmp = TempDir::new().unwrap();
        write_wav(&tmp.path().join("AO_REC_WeeklySync_20240115_093000.wav"), 1);

        let gateway = canned_gateway();
        let driver = BatchDriver::new(quiet_config(tmp.path()), &gateway);
        let outcomes = driver.run().unwrap();
        assert!(outcomes[0].succeeded);

        let out_dir = tmp.path().join("transcripts").join("WeeklySync_2024-01-15");
        assert!(out_dir.join("AO_REC_WeeklySync_20240115_093000.json").exists());
    }

    #[test]
    fn metadata_sidecar_drives_speaker_names() {
        let tmp = TempDir::new().unwrap();
        write_wav(&tmp.path().join("rec.wav"), 1);
        std::fs::write(
            tmp.path().join("rec_metadata.json"),
            r#"{"speaker_count": 1, "attendees": [{"name": "Alice", "id": 1}]}"#,
        )
        .unwrap();

        let gateway = canned_gateway();
        let driver = BatchDriver::new(quiet_config(tmp.path()), &gateway);
        let outcomes = driver.run().unwrap();

        let text = std::fs::read_to_string(&outcomes[0].outputs.as_ref().unwrap().text).unwrap();
        assert_eq!(text, "Alice: hello\n");
    }

    #[test]
    fn preset_interrupt_stops_before_first_recording() {
        let tmp = TempDir::new().unwrap();
        write_wav(&tmp.path().join("rec1.wav"), 1);
        write_wav(&tmp.path().join("rec2.wav"), 1);

        let interrupt = Arc::new(AtomicBool::new(true));
        let gateway = canned_gateway();
        let driver =
            BatchDriver::new(quiet_config(tmp.path()), &gateway).with_interrupt(interrupt);
        let outcomes = driver.run().unwrap();
        assert!(outcomes.is_empty());
    }
}
