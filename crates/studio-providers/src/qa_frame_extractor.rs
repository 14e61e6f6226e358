//! QA Frame Extractor (§6): pulls sample frames from a rendered video for
//! the QA Verifier to inspect via Vision Completion. Only consumed in live
//! mode — the deterministic QA mock never calls this.

use async_trait::async_trait;
use base64::Engine;
use studio_core::{StudioError, StudioResult};

#[async_trait]
pub trait QaFrameExtractor: Send + Sync {
    async fn extract_frames(&self, video_url: &str, n: u32) -> StudioResult<Vec<String>>;
}

/// Deterministic stand-in: returns `n` base64 frames, each a distinct
/// 1x1 PNG so callers can assert on count and on the frames actually
/// differing rather than decode real pixels.
pub struct MockQaFrameExtractor;

impl MockQaFrameExtractor {
    pub fn new() -> Self {
        MockQaFrameExtractor
    }
}

impl Default for MockQaFrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

const PNG_1X1_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[async_trait]
impl QaFrameExtractor for MockQaFrameExtractor {
    async fn extract_frames(&self, video_url: &str, n: u32) -> StudioResult<Vec<String>> {
        if video_url.trim().is_empty() {
            return Err(StudioError::InvalidInput("video_url must not be empty".to_string()));
        }
        if n == 0 {
            return Err(StudioError::InvalidInput("frame count must be positive".to_string()));
        }

        Ok((0..n)
            .map(|i| {
                let mut bytes = PNG_1X1_HEADER.to_vec();
                bytes.push(i as u8);
                base64::engine::general_purpose::STANDARD.encode(bytes)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extracts_requested_frame_count() {
        let extractor = MockQaFrameExtractor::new();
        let frames = extractor.extract_frames("https://mock-cdn.example.com/scene.mp4", 3).await.unwrap();
        assert_eq!(frames.len(), 3);
    }

    #[tokio::test]
    async fn frames_are_distinct() {
        let extractor = MockQaFrameExtractor::new();
        let frames = extractor.extract_frames("https://mock-cdn.example.com/scene.mp4", 4).await.unwrap();
        let unique: std::collections::HashSet<_> = frames.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[tokio::test]
    async fn zero_frame_count_is_rejected() {
        let extractor = MockQaFrameExtractor::new();
        assert!(extractor.extract_frames("https://mock-cdn.example.com/scene.mp4", 0).await.is_err());
    }
}
