//! Turn segmentation: coalesce labeled segments into conversation turns.

use crate::defaults;
use crate::transcript::{ConversationTurn, Segment, SpeakerMap};

/// Coalesce ordered, speaker-labeled segments into conversational turns.
///
/// Segments are consumed in their given (start-time) order. Each raw label is
/// resolved through `speaker_map` (absent labels become `"Unknown"`); while
/// the resolved speaker stays the same, trimmed segment texts accumulate into
/// one turn joined by single spaces. A speaker change flushes the buffer, and
/// the final buffer is flushed after the last segment when it holds any text.
///
/// Deterministic and idempotent for a fixed input; reordering the input
/// changes the result by design, since turns mirror time order.
pub fn coalesce(segments: &[Segment], speaker_map: &SpeakerMap) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    let mut current_speaker: Option<String> = None;
    let mut buffer = String::new();

    for segment in segments {
        let speaker = match &segment.speaker {
            Some(label) => speaker_map.resolve(label),
            None => defaults::UNKNOWN_SPEAKER.to_string(),
        };

        if current_speaker.as_deref() != Some(&speaker) {
            if let Some(previous) = current_speaker.take() {
                turns.push(ConversationTurn {
                    speaker: previous,
                    text: std::mem::take(&mut buffer),
                });
            }
            current_speaker = Some(speaker);
        }

        let text = segment.text.trim();
        if !text.is_empty() {
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(text);
        }
    }

    if let Some(speaker) = current_speaker
        && !buffer.is_empty()
    {
        turns.push(ConversationTurn {
            speaker,
            text: buffer,
        });
    }

    turns
}
