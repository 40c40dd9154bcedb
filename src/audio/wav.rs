//! WAV decoding for batch recordings.
//!
//! Supports arbitrary sample rates and channel counts, downmixing to mono
//! and resampling to 16kHz — the format every model stage consumes.

use std::io::Read;
use std::path::Path;

use crate::defaults::SAMPLE_RATE;
use crate::error::{MeetscribeError, Result};

/// Load a recording from disk as 16-bit PCM, mono, 16kHz.
///
/// Fails on unreadable/undecodable files and on recordings that decode to
/// zero samples (an empty recording cannot produce a transcript and would
/// only fail deeper inside a model call with a worse message).
pub fn load_recording(path: &Path) -> Result<Vec<i16>> {
    let file = std::fs::File::open(path).map_err(|e| MeetscribeError::AudioLoad {
        message: format!("{}: {}", path.display(), e),
    })?;
    let samples = decode(Box::new(std::io::BufReader::new(file)))?;

    if samples.is_empty() {
        return Err(MeetscribeError::EmptyAudio {
            path: path.display().to_string(),
        });
    }
    Ok(samples)
}

/// Decode WAV data from any reader into mono 16kHz samples.
pub fn decode(reader: Box<dyn Read>) -> Result<Vec<i16>> {
    let mut wav_reader = hound::WavReader::new(reader).map_err(|e| MeetscribeError::AudioLoad {
        message: format!("Failed to parse WAV data: {}", e),
    })?;

    let spec = wav_reader.spec();
    let source_rate = spec.sample_rate;
    let source_channels = spec.channels;

    let raw_samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MeetscribeError::AudioLoad {
            message: format!("Failed to read WAV samples: {}", e),
        })?;

    let mono_samples = downmix(&raw_samples, source_channels);

    Ok(if source_rate != SAMPLE_RATE {
        resample(&mono_samples, source_rate, SAMPLE_RATE)
    } else {
        mono_samples
    })
}

/// Average interleaved channels down to mono.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn make_wav_data(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    #[test]
    fn decode_16khz_mono_matches_exactly() {
        let input = vec![100i16, 200, 300, 400, 500];
        let wav_data = make_wav_data(16000, 1, &input);
        let samples = decode(Box::new(Cursor::new(wav_data))).unwrap();
        assert_eq!(samples, input);
    }

    #[test]
    fn decode_stereo_downmixes_to_mono() {
        // Stereo pairs: (100, 200), (300, 400), (500, 600)
        let stereo = vec![100i16, 200, 300, 400, 500, 600];
        let wav_data = make_wav_data(16000, 2, &stereo);
        let samples = decode(Box::new(Cursor::new(wav_data))).unwrap();
        assert_eq!(samples, vec![150i16, 350, 550]);
    }

    #[test]
    fn decode_resamples_to_16khz() {
        let input = vec![0i16; 32000];
        let wav_data = make_wav_data(32000, 1, &input);
        let samples = decode(Box::new(Cursor::new(wav_data))).unwrap();
        assert_eq!(samples.len(), 16000);
    }

    #[test]
    fn decode_rejects_non_wav_data() {
        let result = decode(Box::new(Cursor::new(b"definitely not a wav".to_vec())));
        assert!(matches!(result, Err(MeetscribeError::AudioLoad { .. })));
    }

    #[test]
    fn load_recording_rejects_missing_file() {
        let result = load_recording(Path::new("/nonexistent/recording.wav"));
        assert!(matches!(result, Err(MeetscribeError::AudioLoad { .. })));
    }

    #[test]
    fn load_recording_rejects_empty_audio() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("empty.wav");
        std::fs::write(&path, make_wav_data(16000, 1, &[])).unwrap();

        let result = load_recording(&path);
        assert!(matches!(result, Err(MeetscribeError::EmptyAudio { .. })));
    }

    #[test]
    fn downmix_quad_averages_four_channels() {
        let quad = vec![100i16, 200, 300, 400];
        assert_eq!(downmix(&quad, 4), vec![250i16]);
    }

    #[test]
    fn resample_identity_when_rates_match() {
        let samples = vec![1i16, 2, 3];
        assert_eq!(resample(&samples, 16000, 16000), samples);
    }
}
