//! Speaker assignment: merge diarized intervals onto transcript segments.

use crate::transcript::{Segment, SpeakerInterval};

/// Attribute each segment to the speaker interval it overlaps the most.
///
/// Segments that overlap no interval at all keep an absent speaker; the turn
/// segmenter later surfaces those as `"Unknown"`. Ties resolve to the
/// earliest interval in the list, which is deterministic because diarizers
/// emit intervals in time order.
pub fn assign_by_overlap(mut segments: Vec<Segment>, intervals: &[SpeakerInterval]) -> Vec<Segment> {
    for segment in &mut segments {
        segment.speaker = best_overlap(intervals, segment.start, segment.end)
            .map(|interval| interval.speaker.clone());
    }
    segments
}

/// Find the interval with the largest overlap against `[start, end]`.
fn best_overlap(intervals: &[SpeakerInterval], start: f64, end: f64) -> Option<&SpeakerInterval> {
    intervals
        .iter()
        .filter_map(|interval| {
            let overlap_start = start.max(interval.start);
            let overlap_end = end.min(interval.end);
            let overlap = overlap_end - overlap_start;
            (overlap > 0.0).then_some((interval, overlap))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(interval, _)| interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: f64, end: f64, speaker: &str) -> SpeakerInterval {
        SpeakerInterval {
            start,
            end,
            speaker: speaker.to_string(),
        }
    }

    #[test]
    fn assigns_dominant_overlap() {
        let intervals = vec![
            interval(0.0, 2.0, "SPEAKER_1"),
            interval(2.0, 4.0, "SPEAKER_2"),
        ];
        // Segment 1.5..3.5 overlaps SPEAKER_1 by 0.5s and SPEAKER_2 by 1.5s.
        let segments = assign_by_overlap(vec![Segment::new(1.5, 3.5, "text")], &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_2"));
    }

    #[test]
    fn segment_outside_all_intervals_stays_unlabeled() {
        let intervals = vec![interval(0.0, 1.0, "SPEAKER_1")];
        let segments = assign_by_overlap(vec![Segment::new(5.0, 6.0, "late")], &intervals);
        assert_eq!(segments[0].speaker, None);
    }

    #[test]
    fn empty_intervals_leave_all_segments_unlabeled() {
        let segments = assign_by_overlap(
            vec![Segment::new(0.0, 1.0, "a"), Segment::new(1.0, 2.0, "b")],
            &[],
        );
        assert!(segments.iter().all(|s| s.speaker.is_none()));
    }

    #[test]
    fn exact_containment_assigns_container() {
        let intervals = vec![interval(0.0, 10.0, "SPEAKER_1")];
        let segments = assign_by_overlap(vec![Segment::new(3.0, 4.0, "inside")], &intervals);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_1"));
    }

    #[test]
    fn touching_boundary_is_not_overlap() {
        let intervals = vec![interval(0.0, 1.0, "SPEAKER_1")];
        let segments = assign_by_overlap(vec![Segment::new(1.0, 2.0, "after")], &intervals);
        assert_eq!(segments[0].speaker, None);
    }

    #[test]
    fn reassignment_overwrites_previous_labels() {
        let first = vec![interval(0.0, 2.0, "SPEAKER_1")];
        let second = vec![interval(0.0, 2.0, "SPEAKER_2")];
        let segments = assign_by_overlap(vec![Segment::new(0.0, 1.0, "x")], &first);
        let segments = assign_by_overlap(segments, &second);
        assert_eq!(segments[0].speaker.as_deref(), Some("SPEAKER_2"));
    }
}
