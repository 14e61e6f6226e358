//! Video Provider (§6): the raw generation backend behind `VideoGenerator`.
//! One call produces one variation; the agent layer fans this out across
//! `num_variations` and retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::StudioResult;
use studio_types::ProductionTier;

/// A single prior-scene reference used to chain generations together.
#[derive(Debug, Clone)]
pub struct ChainReference<'a> {
    pub scene_id: &'a str,
    pub video_url: &'a str,
}

/// Raw output of one generation call. `VideoGenerator` wraps this into a
/// `GeneratedVideo` with scene-level bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedVideoPayload {
    pub video_url: String,
    pub duration: f64,
    pub cost: f64,
    #[serde(default)]
    pub contains_previous: bool,
    #[serde(default)]
    pub new_content_start: f64,
    #[serde(default)]
    pub chain_group: Option<String>,
}

#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn generate(
        &self,
        scene_prompt: &str,
        tier: ProductionTier,
        variation_id: u32,
        chain_from: Option<ChainReference<'_>>,
    ) -> StudioResult<GeneratedVideoPayload>;
}

/// Deterministic stand-in: synthesizes a CDN-shaped URL from the prompt
/// hash and variation id, costing a fixed per-second rate independent of
/// tier (the agent layer, not the provider, is where tier cost scaling
/// lives per the cost model).
pub struct MockVideoProvider {
    pub cost_per_second: f64,
    pub default_duration: f64,
}

impl MockVideoProvider {
    pub fn new() -> Self {
        Self {
            cost_per_second: 0.5,
            default_duration: 5.0,
        }
    }
}

impl Default for MockVideoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoProvider for MockVideoProvider {
    async fn generate(
        &self,
        scene_prompt: &str,
        _tier: ProductionTier,
        variation_id: u32,
        chain_from: Option<ChainReference<'_>>,
    ) -> StudioResult<GeneratedVideoPayload> {
        let hash = scene_prompt.len();
        let video_url = format!("https://mock-cdn.example.com/gen_{hash}_v{variation_id}.mp4");
        let is_chained = chain_from.is_some();
        Ok(GeneratedVideoPayload {
            video_url,
            duration: self.default_duration,
            cost: self.default_duration * self.cost_per_second,
            contains_previous: is_chained,
            new_content_start: if is_chained { 0.5 } else { 0.0 },
            chain_group: chain_from.map(|c| c.scene_id.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unchained_generation_has_no_previous_content() {
        let provider = MockVideoProvider::new();
        let payload = provider.generate("a quiet lab", ProductionTier::Motion, 0, None).await.unwrap();
        assert!(!payload.contains_previous);
        assert_eq!(payload.new_content_start, 0.0);
    }

    #[tokio::test]
    async fn chained_generation_carries_metadata() {
        let provider = MockVideoProvider::new();
        let chain = ChainReference {
            scene_id: "scene_000",
            video_url: "https://mock-cdn.example.com/gen_prev.mp4",
        };
        let payload = provider.generate("a quiet lab, continued", ProductionTier::Motion, 0, Some(chain)).await.unwrap();
        assert!(payload.contains_previous);
        assert_eq!(payload.chain_group.as_deref(), Some("scene_000"));
    }
}
