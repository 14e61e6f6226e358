//! Video Generator: produces one or more video variations for a scene,
//! stopping early if the next variation would exceed its budget limit.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::{cost_model, StudioResult};
use studio_types::ProductionTier;

use crate::retry::retry_with_backoff;
use crate::scene::Scene;

/// A prior scene's generation, passed to a chained scene so the provider
/// can continue from its last frame / generation reference. Borrowed from
/// whichever variation the pilot runner selected as that scene's best.
#[derive(Debug, Clone, Copy)]
pub struct ChainFrom<'a> {
    pub scene_id: &'a str,
    pub video_url: &'a str,
}

/// One generated video variation, costed against the tier's cost model.
///
/// `contains_previous = true` means the provider literally prepended the
/// chained-from scene's frames onto this clip; `new_content_start` is
/// where this scene's own content begins within `duration`, and
/// downstream trims (the Editor, §4.7) must offset by it rather than
/// trust `duration` alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedVideo {
    pub scene_id: String,
    pub variation_id: u32,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub generation_cost: f64,
    pub provider: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub contains_previous: bool,
    #[serde(default)]
    pub new_content_start: f64,
    #[serde(default)]
    pub total_video_duration: f64,
    #[serde(default)]
    pub is_chained: bool,
    pub chain_group: Option<String>,
}

fn tier_style(tier: ProductionTier) -> &'static str {
    match tier {
        ProductionTier::Static => "clean illustration, high contrast, professional presentation",
        ProductionTier::Motion => "smooth motion graphics, modern design, infographic style",
        ProductionTier::Animated => "stylized animation, engaging movement, vibrant colors",
        ProductionTier::Photorealistic => "cinematic realism, natural lighting, professional cinematography",
    }
}

fn tier_provider(tier: ProductionTier) -> &'static str {
    match tier {
        ProductionTier::Static => "dalle",
        ProductionTier::Motion => "stability",
        ProductionTier::Animated => "pika",
        ProductionTier::Photorealistic => "runway_gen3",
    }
}

fn build_prompt(scene: &Scene, tier: ProductionTier, chain_from: Option<ChainFrom<'_>>) -> String {
    let mut prompt = scene.description.clone();
    if !scene.visual_elements.is_empty() {
        prompt.push_str(&format!(". Visual elements: {}", scene.visual_elements.join(", ")));
    }
    prompt.push_str(&format!(". Style: {}", tier_style(tier)));
    if !scene.prompt_hints.is_empty() {
        prompt.push_str(&format!(". {}", scene.prompt_hints.join(", ")));
    }
    if let Some(from) = chain_from {
        prompt.push_str(&format!(". Continue directly from scene {} ({})", from.scene_id, from.video_url));
    }
    prompt.push_str(&format!(". Duration: {}s", scene.duration));
    prompt
}

/// Generates video variations for a single scene. `chain_from`, when set,
/// asks the provider to continue from a prior scene's last frame or
/// generation reference — only meaningful for scenes inside a sequential
/// execution-graph group.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate_scene(
        &self,
        scene: &Scene,
        tier: ProductionTier,
        budget_limit: f64,
        num_variations: u32,
        chain_from: Option<ChainFrom<'_>>,
    ) -> StudioResult<Vec<GeneratedVideo>>;
}

/// Deterministic stand-in for a real video generation API. Costs each
/// variation against the tier's per-second rate and stops generating once
/// the next variation would exceed `budget_limit`; retries transient
/// failures (none occur in the mock, but the retry plumbing matches the
/// real provider's shape). When chained, mimics a provider that prepends
/// the previous scene's tail onto the new clip: `new_content_start` marks
/// where the scene's own content actually begins.
pub struct MockVideoGenerator {
    pub retry_attempts: u32,
    pub backoff: Duration,
}

impl MockVideoGenerator {
    pub fn new() -> Self {
        MockVideoGenerator {
            retry_attempts: 3,
            backoff: Duration::from_millis(1),
        }
    }
}

impl Default for MockVideoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed overlap a chained provider call prepends from the previous
/// scene, in seconds.
const CHAIN_OVERLAP_SEC: f64 = 0.5;

#[async_trait]
impl VideoGenerator for MockVideoGenerator {
    async fn generate_scene(
        &self,
        scene: &Scene,
        tier: ProductionTier,
        budget_limit: f64,
        num_variations: u32,
        chain_from: Option<ChainFrom<'_>>,
    ) -> StudioResult<Vec<GeneratedVideo>> {
        let model = cost_model(tier);
        let provider = tier_provider(tier);
        let mut videos = Vec::new();
        let mut spent = 0.0;

        let chain_group = scene.continuity_group.clone();
        let chain_scene_id = chain_from.map(|c| c.scene_id.to_string());
        let chain_video_url = chain_from.map(|c| c.video_url.to_string());

        for variation_id in 0..num_variations {
            let estimated_cost = scene.duration * model.cost_per_second;
            if spent + estimated_cost > budget_limit {
                tracing::info!(
                    scene_id = %scene.scene_id,
                    variations_generated = variation_id,
                    "budget limit reached, stopping variation generation"
                );
                break;
            }

            let prompt = build_prompt(scene, tier, chain_from);
            let is_chained = chain_from.is_some();
            let chain_group = chain_group.clone();
            let chain_scene_id = chain_scene_id.clone();
            let chain_video_url = chain_video_url.clone();
            let video = retry_with_backoff(self.retry_attempts, self.backoff, |_| {
                let scene_id = scene.scene_id.clone();
                let prompt = prompt.clone();
                let chain_group = chain_group.clone();
                let chain_scene_id = chain_scene_id.clone();
                let chain_video_url = chain_video_url.clone();
                async move {
                    let mut metadata = serde_json::Map::new();
                    metadata.insert("prompt".to_string(), prompt.into());
                    metadata.insert("tier".to_string(), format!("{tier:?}").to_lowercase().into());
                    metadata.insert("model".to_string(), format!("{provider}_latest").into());
                    metadata.insert("resolution".to_string(), "1920x1080".into());
                    metadata.insert("fps".to_string(), 30.into());
                    if let Some(from_scene) = &chain_scene_id {
                        metadata.insert("chained_from_scene".to_string(), from_scene.clone().into());
                    }
                    if let Some(from_url) = &chain_video_url {
                        metadata.insert("chained_from_video".to_string(), from_url.clone().into());
                    }

                    let total_video_duration = if is_chained {
                        scene.duration + CHAIN_OVERLAP_SEC
                    } else {
                        scene.duration
                    };

                    Ok(GeneratedVideo {
                        scene_id: scene_id.clone(),
                        variation_id,
                        video_url: format!("https://mock-cdn.example.com/{scene_id}_v{variation_id}.mp4"),
                        thumbnail_url: format!("https://mock-cdn.example.com/{scene_id}_v{variation_id}_thumb.jpg"),
                        duration: scene.duration,
                        generation_cost: scene.duration * model.cost_per_second,
                        provider: provider.to_string(),
                        metadata,
                        quality_score: None,
                        contains_previous: is_chained,
                        new_content_start: if is_chained { CHAIN_OVERLAP_SEC } else { 0.0 },
                        total_video_duration,
                        is_chained,
                        chain_group: chain_group.clone(),
                    })
                }
            })
            .await?;

            spent += video.generation_cost;
            videos.push(video);
        }

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(duration: f64) -> Scene {
        Scene {
            scene_id: "scene_001".to_string(),
            title: "Test".to_string(),
            description: "A lab with beakers".to_string(),
            duration,
            visual_elements: vec!["beaker".to_string()],
            audio_notes: String::new(),
            transition_in: "cut".to_string(),
            transition_out: "cut".to_string(),
            prompt_hints: vec![],
            voiceover_text: None,
            sync_points: vec![],
            music_transition: "continue".to_string(),
            sfx_cues: vec![],
            vo_start_offset: 0.0,
            vo_end_buffer: 0.5,
            seed_asset_refs: vec![],
            text_overlay: None,
            text_position: "center".to_string(),
            text_style: "title".to_string(),
            text_start_time: None,
            text_duration: None,
            continuity_group: None,
        }
    }

    #[tokio::test]
    async fn generates_requested_variation_count_within_budget() {
        let gen = MockVideoGenerator::new();
        let videos = gen.generate_scene(&scene(5.0), ProductionTier::Motion, 100.0, 3, None).await.unwrap();
        assert_eq!(videos.len(), 3);
        assert!(videos.iter().enumerate().all(|(i, v)| v.variation_id == i as u32));
        assert!(videos.iter().all(|v| !v.contains_previous));
    }

    #[tokio::test]
    async fn stops_early_when_budget_is_exhausted() {
        let gen = MockVideoGenerator::new();
        let model = cost_model(ProductionTier::Photorealistic);
        let per_variation_cost = 5.0 * model.cost_per_second;
        let videos = gen
            .generate_scene(&scene(5.0), ProductionTier::Photorealistic, per_variation_cost * 1.5, 3, None)
            .await
            .unwrap();
        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn chained_generation_carries_previous_scene_metadata() {
        let gen = MockVideoGenerator::new();
        let from = ChainFrom {
            scene_id: "scene_000",
            video_url: "https://mock-cdn.example.com/scene_000_v0.mp4",
        };
        let videos = gen.generate_scene(&scene(5.0), ProductionTier::Motion, 100.0, 1, Some(from)).await.unwrap();
        let video = &videos[0];
        assert!(video.contains_previous);
        assert!(video.is_chained);
        assert_eq!(video.new_content_start, CHAIN_OVERLAP_SEC);
        assert!(video.total_video_duration > video.duration);
    }
}
