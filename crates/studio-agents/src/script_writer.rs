//! Script Writer: expands a user request into a scene-by-scene shot list.

use async_trait::async_trait;
use studio_core::StudioResult;
use studio_types::ProductionTier;

use crate::scene::{auto_scene_count, Scene};

/// Writes the scene list for a pilot or full production run.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write_scenes(
        &self,
        user_request: &str,
        tier: ProductionTier,
        target_duration_sec: f64,
        num_scenes: Option<u32>,
    ) -> StudioResult<Vec<Scene>>;
}

/// Deterministic stand-in for an LLM script writer: splits the requested
/// duration evenly across a scene count derived from [`auto_scene_count`]
/// (or the caller's override), stamping each scene with a generic
/// description drawn from the user request.
pub struct MockScriptWriter;

impl MockScriptWriter {
    pub fn new() -> Self {
        MockScriptWriter
    }
}

impl Default for MockScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptWriter for MockScriptWriter {
    async fn write_scenes(
        &self,
        user_request: &str,
        _tier: ProductionTier,
        target_duration_sec: f64,
        num_scenes: Option<u32>,
    ) -> StudioResult<Vec<Scene>> {
        let count = num_scenes.unwrap_or_else(|| auto_scene_count(target_duration_sec) as u32).max(1);
        let per_scene_duration = (target_duration_sec / count as f64).clamp(3.0, 8.0);

        let scenes = (0..count)
            .map(|i| Scene {
                scene_id: format!("scene_{:03}", i + 1),
                title: format!("Scene {}", i + 1),
                description: format!("{user_request} — part {} of {count}", i + 1),
                duration: per_scene_duration,
                visual_elements: vec!["establishing framing".to_string()],
                audio_notes: "narration over background music".to_string(),
                transition_in: if i == 0 { "fade".to_string() } else { "cut".to_string() },
                transition_out: if i + 1 == count { "fade".to_string() } else { "cut".to_string() },
                prompt_hints: vec![],
                voiceover_text: Some(format!("Narration for scene {}.", i + 1)),
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
            })
            .collect();

        Ok(scenes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_requested_scene_count_with_even_durations() {
        let writer = MockScriptWriter::new();
        let scenes = writer.write_scenes("A documentary about bees", ProductionTier::Motion, 60.0, Some(10)).await.unwrap();
        assert_eq!(scenes.len(), 10);
        let total: f64 = scenes.iter().map(|s| s.duration).sum();
        assert!((total - 60.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn falls_back_to_auto_scene_count_when_unspecified() {
        let writer = MockScriptWriter::new();
        let scenes = writer.write_scenes("req", ProductionTier::Static, 100.0, None).await.unwrap();
        assert_eq!(scenes.len(), auto_scene_count(100.0));
    }
}
