//! Output artifact writing.
//!
//! Each processed recording materializes three files under its output
//! directory: the detailed segment transcript (`<stem>.json`), the coalesced
//! conversation (`<stem>_conversation.json`), and a plain-text rendering
//! (`<stem>.txt`, one `speaker: text` line per turn). JSON artifacts use
//! 4-space indentation and keep non-ASCII characters literal, and all writes
//! overwrite previous runs — reprocessing identical input reproduces
//! byte-identical files.

use log::info;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::{MeetscribeError, Result};
use crate::transcript::{ConversationTurn, Segment, SpeakerMap};

/// Paths of the three artifacts written for one recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub transcript: PathBuf,
    pub conversation: PathBuf,
    pub text: PathBuf,
}

/// Write all artifacts for one recording.
///
/// The speaker map is applied to segment labels here, so the persisted
/// detailed transcript carries human names rather than raw diarization
/// labels. The turns are expected to be already name-mapped by the turn
/// segmenter.
pub fn materialize(
    stem: &str,
    segments: &[Segment],
    turns: &[ConversationTurn],
    speaker_map: &SpeakerMap,
    output_dir: &Path,
) -> Result<OutputPaths> {
    std::fs::create_dir_all(output_dir).map_err(|e| MeetscribeError::OutputWrite {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mapped: Vec<Segment> = segments
        .iter()
        .map(|segment| {
            let mut segment = segment.clone();
            segment.speaker = segment.speaker.as_deref().map(|s| speaker_map.resolve(s));
            segment
        })
        .collect();

    let paths = OutputPaths {
        transcript: output_dir.join(format!("{stem}.json")),
        conversation: output_dir.join(format!("{stem}_conversation.json")),
        text: output_dir.join(format!("{stem}.txt")),
    };

    write_json(&paths.transcript, &mapped)?;
    write_json(&paths.conversation, &turns)?;
    write_file(&paths.text, &render_turn_text(turns))?;

    info!("Saved transcript artifacts under {}", output_dir.display());
    Ok(paths)
}

/// Plain-text rendering: one line per conversational turn.
fn render_turn_text(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        let _ = writeln!(out, "{}: {}", turn.speaker, turn.text);
    }
    out
}

/// Legacy whole-file text format kept for older downstream consumers:
/// a stamped header followed by one line per segment.
pub fn render_legacy_text(file_name: &str, speaker_count: u32, segments: &[Segment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Transcription for {} ===", file_name);
    let _ = writeln!(out, "Number of speakers: {}", speaker_count);
    let _ = writeln!(out);
    for segment in segments {
        let speaker = segment.speaker.as_deref().unwrap_or(crate::defaults::UNKNOWN_SPEAKER);
        let _ = writeln!(
            out,
            "[{:.2}s -> {:.2}s] Speaker {}: {}",
            segment.start, segment.end, speaker, segment.text
        );
    }
    out
}

/// Write the legacy text artifact in place of nothing — callers opt in via
/// config and receive the path actually written.
pub fn materialize_legacy_text(
    stem: &str,
    file_name: &str,
    speaker_count: u32,
    segments: &[Segment],
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = output_dir.join(format!("{stem}_full.txt"));
    write_file(&path, &render_legacy_text(file_name, speaker_count, segments))?;
    Ok(path)
}

/// Serialize with 4-space indentation, matching the sidecar/artifact
/// conventions of the authoring tools. serde_json leaves non-ASCII
/// characters unescaped, which these artifacts rely on.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| MeetscribeError::OutputWrite {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    std::fs::write(path, buf).map_err(|e| MeetscribeError::OutputWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| MeetscribeError::OutputWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment::new(0.0, 1.0, "Hi").with_speaker("SPEAKER_1"),
            Segment::new(1.0, 2.0, "there").with_speaker("SPEAKER_1"),
            Segment::new(2.0, 3.0, "Bye").with_speaker("SPEAKER_2"),
        ]
    }

    fn sample_turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn {
                speaker: "Alice".to_string(),
                text: "Hi there".to_string(),
            },
            ConversationTurn {
                speaker: "Bob".to_string(),
                text: "Bye".to_string(),
            },
        ]
    }

    fn speaker_map() -> SpeakerMap {
        SpeakerMap::from_pairs([("SPEAKER_1", "Alice"), ("SPEAKER_2", "Bob")])
    }

    #[test]
    fn writes_all_three_artifacts() {
        let tmp = TempDir::new().unwrap();
        let paths = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();

        assert!(paths.transcript.exists());
        assert!(paths.conversation.exists());
        assert!(paths.text.exists());
        assert_eq!(paths.transcript.file_name().unwrap(), "rec.json");
        assert_eq!(
            paths.conversation.file_name().unwrap(),
            "rec_conversation.json"
        );
        assert_eq!(paths.text.file_name().unwrap(), "rec.txt");
    }

    #[test]
    fn transcript_carries_mapped_names() {
        let tmp = TempDir::new().unwrap();
        let paths = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(&paths.transcript).unwrap();
        assert!(contents.contains("\"Alice\""));
        assert!(contents.contains("\"Bob\""));
        assert!(!contents.contains("SPEAKER_1"));
    }

    #[test]
    fn json_uses_four_space_indent() {
        let tmp = TempDir::new().unwrap();
        let paths = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(&paths.transcript).unwrap();
        assert!(contents.contains("\n    {"));
        assert!(contents.contains("\n        \"start\""));
    }

    #[test]
    fn non_ascii_is_preserved_literally() {
        let tmp = TempDir::new().unwrap();
        let segments = vec![Segment::new(0.0, 1.0, "café 日本語").with_speaker("SPEAKER_1")];
        let turns = vec![ConversationTurn {
            speaker: "José".to_string(),
            text: "café 日本語".to_string(),
        }];
        let paths = materialize("rec", &segments, &turns, &SpeakerMap::default(), tmp.path())
            .unwrap();

        let transcript = std::fs::read_to_string(&paths.transcript).unwrap();
        let conversation = std::fs::read_to_string(&paths.conversation).unwrap();
        assert!(transcript.contains("café 日本語"));
        assert!(conversation.contains("José"));
        assert!(!transcript.contains("\\u"));
    }

    #[test]
    fn text_file_has_one_line_per_turn() {
        let tmp = TempDir::new().unwrap();
        let paths = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();

        let contents = std::fs::read_to_string(&paths.text).unwrap();
        assert_eq!(contents, "Alice: Hi there\nBob: Bye\n");
    }

    #[test]
    fn reprocessing_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let first = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();
        let bytes_first = std::fs::read(&first.transcript).unwrap();

        let second = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            tmp.path(),
        )
        .unwrap();
        let bytes_second = std::fs::read(&second.transcript).unwrap();
        assert_eq!(bytes_first, bytes_second);
    }

    #[test]
    fn segment_without_speaker_omits_key_in_artifact() {
        let tmp = TempDir::new().unwrap();
        let segments = vec![Segment::new(0.0, 1.0, "mystery")];
        let paths = materialize("rec", &segments, &[], &SpeakerMap::default(), tmp.path())
            .unwrap();

        let contents = std::fs::read_to_string(&paths.transcript).unwrap();
        assert!(!contents.contains("\"speaker\""));
    }

    #[test]
    fn legacy_text_format_matches_header_convention() {
        let rendered = render_legacy_text("rec.wav", 2, &sample_segments());
        assert!(rendered.starts_with("=== Transcription for rec.wav ===\n"));
        assert!(rendered.contains("Number of speakers: 2\n\n"));
        assert!(rendered.contains("[0.00s -> 1.00s] Speaker SPEAKER_1: Hi\n"));
    }

    #[test]
    fn legacy_text_uses_unknown_for_unlabeled_segments() {
        let rendered = render_legacy_text("rec.wav", 1, &[Segment::new(0.0, 1.0, "hm")]);
        assert!(rendered.contains("Speaker Unknown: hm"));
    }

    #[test]
    fn materialize_legacy_writes_full_txt() {
        let tmp = TempDir::new().unwrap();
        let path =
            materialize_legacy_text("rec", "rec.wav", 2, &sample_segments(), tmp.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "rec_full.txt");
        assert!(path.exists());
    }

    #[test]
    fn unwritable_output_dir_is_an_output_error() {
        let result = materialize(
            "rec",
            &sample_segments(),
            &sample_turns(),
            &speaker_map(),
            Path::new("/proc/definitely/not/writable"),
        );
        assert!(matches!(result, Err(MeetscribeError::OutputWrite { .. })));
    }
}
