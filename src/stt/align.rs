//! Energy-based segment boundary refinement.
//!
//! ASR segment boundaries tend to bleed into surrounding silence. This pass
//! snaps each boundary inward to the first frame that carries speech energy,
//! tightening the timestamps the diarization overlap matching relies on.
//! It runs on raw samples with short RMS frames; no model is loaded.

use crate::defaults::SAMPLE_RATE;
use crate::transcript::Segment;

/// RMS frame length used when scanning for speech energy.
const FRAME_MS: usize = 20;

/// Normalized RMS below which a frame counts as silence.
const SILENCE_RMS: f32 = 0.005;

/// Snap segment boundaries inward past leading/trailing silence.
///
/// Boundaries only ever move inward, and a segment whose audio is entirely
/// below the energy floor keeps its original timing — dropping or inverting
/// segments here would lose transcribed text downstream.
pub fn refine_boundaries(segments: Vec<Segment>, audio: &[i16]) -> Vec<Segment> {
    segments
        .into_iter()
        .map(|segment| refine_segment(segment, audio))
        .collect()
}

fn refine_segment(mut segment: Segment, audio: &[i16]) -> Segment {
    let start_idx = seconds_to_sample(segment.start, audio.len());
    let end_idx = seconds_to_sample(segment.end, audio.len());
    if start_idx >= end_idx {
        return segment;
    }

    let window = &audio[start_idx..end_idx];
    let frame_len = SAMPLE_RATE as usize * FRAME_MS / 1000;
    if window.len() < frame_len * 2 {
        return segment;
    }

    let leading = window
        .chunks(frame_len)
        .take_while(|frame| rms(frame) < SILENCE_RMS)
        .count();
    let trailing = window
        .rchunks(frame_len)
        .take_while(|frame| rms(frame) < SILENCE_RMS)
        .count();

    let total_frames = window.len().div_ceil(frame_len);
    if leading + trailing >= total_frames {
        // All silence; keep the ASR timing.
        return segment;
    }

    let frame_secs = FRAME_MS as f64 / 1000.0;
    segment.start += leading as f64 * frame_secs;
    segment.end -= trailing as f64 * frame_secs;
    if segment.end < segment.start {
        segment.end = segment.start;
    }
    segment
}

fn seconds_to_sample(secs: f64, len: usize) -> usize {
    ((secs * SAMPLE_RATE as f64) as usize).min(len)
}

fn rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = frame
        .iter()
        .map(|&s| {
            let normalized = s as f64 / 32768.0;
            normalized * normalized
        })
        .sum();
    (sum_squares / frame.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One second of silence, one of tone, one of silence.
    fn silence_tone_silence() -> Vec<i16> {
        let rate = SAMPLE_RATE as usize;
        let mut audio = vec![0i16; rate];
        audio.extend((0..rate).map(|i| {
            let t = i as f32 / rate as f32;
            ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 8000.0) as i16
        }));
        audio.extend(vec![0i16; rate]);
        audio
    }

    #[test]
    fn snaps_boundaries_past_silence() {
        let audio = silence_tone_silence();
        let refined = refine_boundaries(vec![Segment::new(0.0, 3.0, "tone")], &audio);

        // The speech sits in [1.0, 2.0]; boundaries should move well inward.
        assert!(refined[0].start > 0.9, "start = {}", refined[0].start);
        assert!(refined[0].end < 2.1, "end = {}", refined[0].end);
        assert!(refined[0].start < refined[0].end);
    }

    #[test]
    fn boundaries_never_expand() {
        let audio = silence_tone_silence();
        let original = Segment::new(1.2, 1.8, "tone");
        let refined = refine_boundaries(vec![original.clone()], &audio);
        assert!(refined[0].start >= original.start);
        assert!(refined[0].end <= original.end);
    }

    #[test]
    fn all_silence_keeps_original_timing() {
        let audio = vec![0i16; SAMPLE_RATE as usize * 2];
        let original = Segment::new(0.5, 1.5, "nothing");
        let refined = refine_boundaries(vec![original.clone()], &audio);
        assert_eq!(refined[0].start, original.start);
        assert_eq!(refined[0].end, original.end);
    }

    #[test]
    fn tiny_segment_is_untouched() {
        let audio = silence_tone_silence();
        let original = Segment::new(1.0, 1.01, "blip");
        let refined = refine_boundaries(vec![original.clone()], &audio);
        assert_eq!(refined[0], original);
    }

    #[test]
    fn text_and_order_are_preserved() {
        let audio = silence_tone_silence();
        let segments = vec![
            Segment::new(0.0, 1.5, "first"),
            Segment::new(1.5, 3.0, "second"),
        ];
        let refined = refine_boundaries(segments, &audio);
        assert_eq!(refined[0].text, "first");
        assert_eq!(refined[1].text, "second");
    }
}
