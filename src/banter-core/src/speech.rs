//! Speech synthesis for voice rebuttals, using kokoro-tiny.
//!
//! Output is in-memory WAV bytes so the server can hand the audio
//! straight back over HTTP.

use std::io::Cursor;

use kokoro_tiny::TtsEngine;

use crate::error::BanterError;

/// Kokoro's output sample rate.
pub const SAMPLE_RATE: u32 = 24_000;

/// Safe per-call text length for the engine.
const MAX_CHUNK_CHARS: usize = 200;

/// Synthesizes rebuttal text to WAV audio with a fixed voice.
pub struct SpeechSynthesizer {
    engine: TtsEngine,
    voice: String,
}

impl SpeechSynthesizer {
    /// Initialize the engine (downloads the model on first run) and
    /// validate the configured voice.
    pub async fn new(voice: impl Into<String>) -> Result<Self, BanterError> {
        let engine = TtsEngine::new()
            .await
            .map_err(|e| BanterError::TtsError(format!("Failed to initialize TTS: {}", e)))?;
        let voice = voice.into();

        let available = engine.voices();
        if !available.contains(&voice) {
            return Err(BanterError::TtsError(format!(
                "Unknown voice '{}'. Available voices: {}",
                voice,
                available.join(", ")
            )));
        }

        Ok(Self { engine, voice })
    }

    /// Synthesize `text` and encode it as a mono 24kHz f32 WAV.
    ///
    /// Long text is synthesized in sentence-sized chunks with short
    /// pauses between them, plus trailing padding so the final word is
    /// not clipped.
    pub fn synthesize_wav(&mut self, text: &str) -> Result<Vec<u8>, BanterError> {
        let mut samples: Vec<f32> = Vec::new();

        for chunk in split_into_chunks(text, MAX_CHUNK_CHARS) {
            let part = self
                .engine
                .synthesize(&chunk, Some(self.voice.as_str()))
                .map_err(|e| BanterError::TtsError(format!("Synthesis failed: {}", e)))?;
            samples.extend(part);
            // 0.3s pause between chunks.
            samples.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as usize) * 3 / 10));
        }
        // 0.5s trailing padding.
        samples.extend(std::iter::repeat(0.0).take((SAMPLE_RATE as usize) / 2));

        encode_wav(&samples)
    }
}

fn encode_wav(samples: &[f32]) -> Result<Vec<u8>, BanterError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| BanterError::TtsError(format!("WAV encode failed: {}", e)))?;
        for &s in samples {
            writer
                .write_sample(s)
                .map_err(|e| BanterError::TtsError(format!("WAV encode failed: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| BanterError::TtsError(format!("WAV encode failed: {}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// Split text into engine-safe chunks at sentence boundaries, falling
/// back to word boundaries for a single oversized sentence.
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    let push_current = |current: &mut String, chunks: &mut Vec<String>| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        current.clear();
    };

    for sentence in text.split_inclusive(&['.', '!', '?', ';'][..]) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if current.len() + sentence.len() + 1 > max_chars {
            push_current(&mut current, &mut chunks);
        }

        if sentence.len() > max_chars {
            // A single run-on sentence: pack words greedily.
            for word in sentence.split_whitespace() {
                if current.len() + word.len() + 1 > max_chars {
                    push_current(&mut current, &mut chunks);
                }
                current.push_str(word);
                current.push(' ');
            }
        } else {
            current.push_str(sentence);
            current.push(' ');
        }
    }
    push_current(&mut current, &mut chunks);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_short_text_single_chunk() {
        let chunks = split_into_chunks("History disagrees with you.", 200);
        assert_eq!(chunks, vec!["History disagrees with you."]);
    }

    #[test]
    fn test_split_respects_max_chars() {
        let text = "First point made. Second point made. Third point made here. Fourth one.";
        for chunk in split_into_chunks(text, 30) {
            assert!(chunk.len() <= 35, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn test_split_oversized_sentence_by_words() {
        let text = "word ".repeat(100);
        let chunks = split_into_chunks(&text, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 45);
        }
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_into_chunks("", 200).is_empty());
        assert!(split_into_chunks("   ", 200).is_empty());
    }

    #[test]
    fn test_encode_wav_is_decodable() {
        let bytes = encode_wav(&[0.1, -0.1, 0.2, -0.2]).unwrap();
        let reader = hound::WavReader::new(Cursor::new(&bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.len(), 4);
    }
}
