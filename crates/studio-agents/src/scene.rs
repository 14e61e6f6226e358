//! The scene-level shooting unit the generation agents operate on — a
//! coarser grain than [`studio_core::ScriptSegment`], closer to a single
//! shot list entry a video generator can act on directly.

use serde::{Deserialize, Serialize};

/// One scene to be shot: description, duration, and the voiceover/overlay
/// timing details the editor needs to cut it into the final sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub scene_id: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    #[serde(default)]
    pub visual_elements: Vec<String>,
    #[serde(default)]
    pub audio_notes: String,
    #[serde(default)]
    pub transition_in: String,
    #[serde(default)]
    pub transition_out: String,
    #[serde(default)]
    pub prompt_hints: Vec<String>,

    pub voiceover_text: Option<String>,
    #[serde(default)]
    pub sync_points: Vec<f64>,
    #[serde(default = "default_music_transition")]
    pub music_transition: String,
    #[serde(default)]
    pub sfx_cues: Vec<String>,
    #[serde(default)]
    pub vo_start_offset: f64,
    #[serde(default = "default_vo_end_buffer")]
    pub vo_end_buffer: f64,
    #[serde(default)]
    pub seed_asset_refs: Vec<String>,

    pub text_overlay: Option<String>,
    #[serde(default = "default_text_position")]
    pub text_position: String,
    #[serde(default = "default_text_style")]
    pub text_style: String,
    pub text_start_time: Option<f64>,
    pub text_duration: Option<f64>,

    #[serde(default)]
    pub continuity_group: Option<String>,
}

fn default_music_transition() -> String {
    "continue".to_string()
}

fn default_vo_end_buffer() -> f64 {
    0.5
}

fn default_text_position() -> String {
    "center".to_string()
}

fn default_text_style() -> String {
    "title".to_string()
}

/// Picks a scene count within `[8, 20]` proportional to the target
/// duration, at roughly one scene per five seconds of runtime.
pub fn auto_scene_count(target_duration_sec: f64) -> usize {
    ((target_duration_sec / 5.0) as usize).clamp(8, 20)
}
