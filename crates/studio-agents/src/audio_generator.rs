//! Audio Generator: builds a scene's audio spec (voiceover, music, sound
//! effects) gated by its [`AudioProductionTier`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::{estimate_audio_cost, StudioResult};
use studio_types::AudioProductionTier;

use crate::scene::Scene;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MusicSpec {
    pub mood: String,
    pub transition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceoverSpec {
    pub text: String,
    pub voice_style: String,
    #[serde(default)]
    pub sync_points: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoundEffectSpec {
    pub cue: String,
}

/// The full audio spec assembled for one scene — every field optional, so
/// a low audio tier can leave most of it unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SceneAudio {
    pub scene_id: String,
    pub voiceover: Option<VoiceoverSpec>,
    pub music: Option<MusicSpec>,
    #[serde(default)]
    pub sound_effects: Vec<SoundEffectSpec>,
    pub estimated_cost: f64,
}

/// Produces the audio spec for a scene.
#[async_trait]
pub trait AudioGenerator: Send + Sync {
    async fn generate_scene_audio(&self, scene: &Scene, audio_tier: AudioProductionTier) -> StudioResult<SceneAudio>;
}

/// Deterministic stand-in for a real TTS/music-generation pipeline:
/// assembles the same spec shape a real provider would produce, gated on
/// tier exactly as the production pipeline gates it.
pub struct MockAudioGenerator;

impl MockAudioGenerator {
    pub fn new() -> Self {
        MockAudioGenerator
    }
}

impl Default for MockAudioGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioGenerator for MockAudioGenerator {
    async fn generate_scene_audio(&self, scene: &Scene, audio_tier: AudioProductionTier) -> StudioResult<SceneAudio> {
        let mut scene_audio = SceneAudio {
            scene_id: scene.scene_id.clone(),
            estimated_cost: estimate_audio_cost(audio_tier, scene.duration),
            ..Default::default()
        };

        if audio_tier == AudioProductionTier::None {
            return Ok(scene_audio);
        }

        if audio_tier == AudioProductionTier::MusicOnly {
            if scene.music_transition != "none" {
                scene_audio.music = Some(MusicSpec {
                    mood: "corporate".to_string(),
                    transition: scene.music_transition.clone(),
                });
            }
            return Ok(scene_audio);
        }

        if let Some(text) = &scene.voiceover_text {
            let sync_points = if matches!(audio_tier, AudioProductionTier::TimeSynced | AudioProductionTier::FullProduction) {
                scene.sync_points.clone()
            } else {
                vec![]
            };
            scene_audio.voiceover = Some(VoiceoverSpec {
                text: text.clone(),
                voice_style: "professional".to_string(),
                sync_points,
            });
        }

        if scene.music_transition != "none" {
            scene_audio.music = Some(MusicSpec {
                mood: "corporate".to_string(),
                transition: scene.music_transition.clone(),
            });
        }

        if audio_tier == AudioProductionTier::FullProduction && !scene.sfx_cues.is_empty() {
            scene_audio.sound_effects = scene.sfx_cues.iter().map(|cue| SoundEffectSpec { cue: cue.clone() }).collect();
        }

        Ok(scene_audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(voiceover: Option<&str>, sfx: Vec<&str>) -> Scene {
        Scene {
            scene_id: "scene_001".to_string(),
            title: "Test".to_string(),
            description: "desc".to_string(),
            duration: 5.0,
            visual_elements: vec![],
            audio_notes: String::new(),
            transition_in: "cut".to_string(),
            transition_out: "cut".to_string(),
            prompt_hints: vec![],
            voiceover_text: voiceover.map(|s| s.to_string()),
            sync_points: vec![1.0, 2.5],
            music_transition: "continue".to_string(),
            sfx_cues: sfx.into_iter().map(|s| s.to_string()).collect(),
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
    async fn none_tier_produces_empty_spec() {
        let gen = MockAudioGenerator::new();
        let audio = gen.generate_scene_audio(&scene_with(Some("hello"), vec!["whoosh"]), AudioProductionTier::None).await.unwrap();
        assert!(audio.voiceover.is_none());
        assert!(audio.music.is_none());
        assert!(audio.sound_effects.is_empty());
    }

    #[tokio::test]
    async fn simple_overlay_has_voiceover_and_music_but_no_sync_points() {
        let gen = MockAudioGenerator::new();
        let audio = gen
            .generate_scene_audio(&scene_with(Some("hello"), vec!["whoosh"]), AudioProductionTier::SimpleOverlay)
            .await
            .unwrap();
        assert!(audio.voiceover.as_ref().unwrap().sync_points.is_empty());
        assert!(audio.music.is_some());
        assert!(audio.sound_effects.is_empty());
    }

    #[tokio::test]
    async fn full_production_includes_sync_points_and_sfx() {
        let gen = MockAudioGenerator::new();
        let audio = gen
            .generate_scene_audio(&scene_with(Some("hello"), vec!["whoosh"]), AudioProductionTier::FullProduction)
            .await
            .unwrap();
        assert_eq!(audio.voiceover.as_ref().unwrap().sync_points, vec![1.0, 2.5]);
        assert_eq!(audio.sound_effects.len(), 1);
    }
}
