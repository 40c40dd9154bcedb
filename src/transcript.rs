//! Transcript data types shared across pipeline stages.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::defaults;
use crate::metadata::Attendee;

/// A transcribed span of speech.
///
/// Produced unlabeled by the ASR stage; the speaker field is filled in by the
/// labeling stage and name-mapped before materialization. The serialized
/// field order is the on-disk artifact order, and an absent speaker is
/// omitted from JSON entirely rather than written as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            speaker: None,
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// A time interval attributed to one speaker by the diarization stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerInterval {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

/// One coalesced conversational turn: consecutive segments by one speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: String,
    pub text: String,
}

/// Mapping from raw diarization labels to human speaker names.
///
/// Built once per recording from the metadata attendee list: the first
/// attendee maps `SPEAKER_1`, the second `SPEAKER_2`, and so on. Labels with
/// no entry resolve to themselves, so an empty map is the identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerMap {
    names: HashMap<String, String>,
}

impl SpeakerMap {
    /// Build the label → name mapping from attendee ordinals (1-based).
    pub fn from_attendees(attendees: &[Attendee]) -> Self {
        let names = attendees
            .iter()
            .enumerate()
            .map(|(i, attendee)| {
                (
                    format!("{}{}", defaults::SPEAKER_LABEL_PREFIX, i + 1),
                    attendee.name.clone(),
                )
            })
            .collect();
        Self { names }
    }

    /// Build a mapping from explicit label/name pairs (tests, custom setups).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Resolve a raw label to a name; unmapped labels pass through unchanged.
    pub fn resolve(&self, label: &str) -> String {
        self.names
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee(name: &str, id: u32) -> Attendee {
        Attendee {
            name: name.to_string(),
            id,
        }
    }

    #[test]
    fn speaker_map_from_attendees_is_one_based() {
        let map = SpeakerMap::from_attendees(&[attendee("Alice", 7), attendee("Bob", 3)]);
        assert_eq!(map.resolve("SPEAKER_1"), "Alice");
        assert_eq!(map.resolve("SPEAKER_2"), "Bob");
    }

    #[test]
    fn speaker_map_passes_unmapped_labels_through() {
        let map = SpeakerMap::from_attendees(&[attendee("Alice", 1)]);
        assert_eq!(map.resolve("SPEAKER_2"), "SPEAKER_2");
        assert_eq!(map.resolve("Unknown"), "Unknown");
    }

    #[test]
    fn empty_speaker_map_is_identity() {
        let map = SpeakerMap::default();
        assert!(map.is_empty());
        assert_eq!(map.resolve("SPEAKER_1"), "SPEAKER_1");
    }

    #[test]
    fn segment_without_speaker_omits_field_in_json() {
        let segment = Segment::new(0.0, 1.5, "hello");
        let json = serde_json::to_string(&segment).unwrap();
        assert!(!json.contains("speaker"));
    }

    #[test]
    fn segment_with_speaker_serializes_in_artifact_order() {
        let segment = Segment::new(0.0, 1.5, "hello").with_speaker("Alice");
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(
            json,
            r#"{"start":0.0,"end":1.5,"text":"hello","speaker":"Alice"}"#
        );
    }

    #[test]
    fn segment_deserializes_with_missing_speaker() {
        let segment: Segment =
            serde_json::from_str(r#"{"start":1.0,"end":2.0,"text":"hi"}"#).unwrap();
        assert_eq!(segment.speaker, None);
    }
}
