//! Audio Provider (§6): text-to-speech backend behind `AudioGenerator`'s
//! voiceover track.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::{StudioError, StudioResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedSpeech {
    #[serde(with = "serde_bytes_as_base64")]
    pub audio_bytes: Vec<u8>,
    pub format: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub provider_metadata: HashMap<String, String>,
}

mod serde_bytes_as_base64 {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[async_trait]
pub trait AudioProvider: Send + Sync {
    async fn generate_speech(&self, text: &str, voice_id: Option<&str>) -> StudioResult<GeneratedSpeech>;
}

/// Deterministic stand-in: synthesizes a duration from word count (at a
/// speaking rate of 2.5 words/sec, matching the timing model
/// `AudioGenerator` already uses for its voiceover map) and returns empty
/// audio bytes, since nothing downstream of this mock decodes them.
pub struct MockAudioProvider {
    pub words_per_second: f64,
    pub sample_rate: u32,
}

impl MockAudioProvider {
    pub fn new() -> Self {
        Self {
            words_per_second: 2.5,
            sample_rate: 24_000,
        }
    }
}

impl Default for MockAudioProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioProvider for MockAudioProvider {
    async fn generate_speech(&self, text: &str, voice_id: Option<&str>) -> StudioResult<GeneratedSpeech> {
        if text.trim().is_empty() {
            return Err(StudioError::InvalidInput("speech text must not be empty".to_string()));
        }
        let word_count = text.split_whitespace().count() as f64;
        let duration = word_count / self.words_per_second;

        let mut provider_metadata = HashMap::new();
        provider_metadata.insert("voice_id".to_string(), voice_id.unwrap_or("default").to_string());

        Ok(GeneratedSpeech {
            audio_bytes: Vec::new(),
            format: "mp3".to_string(),
            duration: Some(duration),
            sample_rate: Some(self.sample_rate),
            provider_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duration_scales_with_word_count() {
        let provider = MockAudioProvider::new();
        let short = provider.generate_speech("one two three", None).await.unwrap();
        let long = provider.generate_speech("one two three four five six seven eight nine ten", None).await.unwrap();
        assert!(long.duration.unwrap() > short.duration.unwrap());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let provider = MockAudioProvider::new();
        assert!(provider.generate_speech("", None).await.is_err());
    }

    #[tokio::test]
    async fn voice_id_defaults_when_unspecified() {
        let provider = MockAudioProvider::new();
        let speech = provider.generate_speech("hello there", None).await.unwrap();
        assert_eq!(speech.provider_metadata.get("voice_id").map(String::as_str), Some("default"));
    }
}
