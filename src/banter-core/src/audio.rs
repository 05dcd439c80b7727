//! Decoded audio and the loudness statistics the prosody analyzer needs.
//!
//! Decoding is WAV-only (hound). Samples are normalized to f32 in [-1, 1]
//! and downmixed to mono, so every loudness query is a plain RMS over a
//! sample range.

use std::io::Cursor;

use crate::error::BanterError;

/// A decoded, mono, normalized audio recording.
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    /// Decode WAV bytes into a mono clip.
    ///
    /// Integer formats are scaled to [-1, 1]; multi-channel audio is
    /// downmixed by averaging each frame.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, BanterError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Int => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<Result<_, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let samples = if channels == 1 {
            raw
        } else {
            raw.chunks(channels)
                .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
                .collect()
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Build a clip directly from mono samples.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Overall loudness in dBFS. Digital silence yields `-inf`.
    pub fn dbfs(&self) -> f64 {
        level_dbfs(&self.samples)
    }

    /// Loudness per fixed-width window, in order. Partial trailing windows
    /// are included; an empty clip yields no windows.
    pub fn window_levels(&self, window_ms: u32) -> Vec<f64> {
        let window = self.samples_per_ms(window_ms);
        self.samples.chunks(window).map(level_dbfs).collect()
    }

    /// Total duration of the chunks whose loudness clears the silence
    /// threshold, scanning at `chunk_ms` granularity.
    pub fn non_silent_secs(&self, threshold_db: f64, chunk_ms: u32) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        let chunk = self.samples_per_ms(chunk_ms);
        self.samples
            .chunks(chunk)
            .filter(|c| level_dbfs(c) > threshold_db)
            .map(|c| c.len() as f64 / self.sample_rate as f64)
            .sum()
    }

    fn samples_per_ms(&self, ms: u32) -> usize {
        ((self.sample_rate as u64 * ms as u64 / 1000) as usize).max(1)
    }
}

fn level_dbfs(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return f64::NEG_INFINITY;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt();
    if rms <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * rms.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alternating +/-a samples: RMS is exactly `a`.
    fn square_wave(amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    #[test]
    fn test_dbfs_of_full_scale_square() {
        let clip = AudioClip::from_samples(square_wave(1.0, 8000), 8000);
        assert!(clip.dbfs().abs() < 1e-9);
    }

    #[test]
    fn test_dbfs_of_silence_is_neg_infinity() {
        let clip = AudioClip::from_samples(vec![0.0; 8000], 8000);
        assert_eq!(clip.dbfs(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_dbfs_matches_amplitude() {
        // amplitude 10^(-15/20) => -15 dBFS
        let amp = 10f32.powf(-15.0 / 20.0);
        let clip = AudioClip::from_samples(square_wave(amp, 8000), 8000);
        assert!((clip.dbfs() + 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_duration() {
        let clip = AudioClip::from_samples(vec![0.0; 4000], 8000);
        assert!((clip.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_silent_secs() {
        // 1s clip, first 750ms audible, last 250ms silent, 10ms chunks.
        let mut samples = square_wave(0.2, 6000);
        samples.extend(vec![0.0; 2000]);
        let clip = AudioClip::from_samples(samples, 8000);
        let non_silent = clip.non_silent_secs(-50.0, 10);
        assert!((non_silent - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_window_levels_counts_partial_window() {
        // 1.2s at 8kHz with 500ms windows: 2 full + 1 partial.
        let clip = AudioClip::from_samples(square_wave(0.5, 9600), 8000);
        assert_eq!(clip.window_levels(500).len(), 3);
    }

    #[test]
    fn test_from_wav_bytes_rejects_garbage() {
        assert!(AudioClip::from_wav_bytes(b"not a wav file").is_err());
        assert!(AudioClip::from_wav_bytes(&[]).is_err());
    }

    #[test]
    fn test_from_wav_bytes_roundtrip() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut buf, spec).unwrap();
            for s in square_wave(0.25, 800) {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        let clip = AudioClip::from_wav_bytes(buf.get_ref()).unwrap();
        assert_eq!(clip.samples.len(), 800);
        assert!((clip.duration_secs() - 0.1).abs() < 1e-9);
    }
}
