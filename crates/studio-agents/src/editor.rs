//! Editor: assembles generated video variations into complete edit
//! candidates — safe, creative, and balanced editorial takes.

use std::collections::HashMap;

use async_trait::async_trait;
use studio_core::StudioResult;
use studio_wire::{EditCandidate, EditDecision};

use crate::qa_verifier::QAResult;
use crate::scene::Scene;
use crate::video_generator::GeneratedVideo;

/// Assembles scenes, their generated video variations, and QA results into
/// a slate of edit candidates.
#[async_trait]
pub trait Editor: Send + Sync {
    async fn generate_candidates(
        &self,
        scenes: &[Scene],
        video_candidates: &HashMap<String, Vec<GeneratedVideo>>,
        qa_results: &HashMap<String, Vec<QAResult>>,
        original_request: &str,
    ) -> StudioResult<Vec<EditCandidate>>;
}

fn best_variation_idx(videos: &[GeneratedVideo], qa: &[QAResult]) -> usize {
    qa.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.overall_score.partial_cmp(&b.overall_score).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .filter(|i| *i < videos.len())
        .unwrap_or(0)
}

fn build_decisions(scenes: &[Scene], video_candidates: &HashMap<String, Vec<GeneratedVideo>>, pick: impl Fn(&[GeneratedVideo]) -> usize) -> Vec<EditDecision> {
    let mut decisions = Vec::new();
    let mut current_time = 0.0;

    for scene in scenes {
        let videos = video_candidates.get(&scene.scene_id).cloned().unwrap_or_default();
        if videos.is_empty() {
            continue;
        }
        let idx = pick(&videos).min(videos.len() - 1);
        let video = &videos[idx];

        // When the source clip carries a prepended previous-scene segment,
        // trim it away: start the in-point at `new_content_start` and clamp
        // the out-point to the clip's actual total duration.
        let (in_point, out_point) = if video.contains_previous {
            let total = if video.total_video_duration > 0.0 { video.total_video_duration } else { video.duration };
            (video.new_content_start, total.max(video.new_content_start))
        } else {
            (0.0, video.duration)
        };
        let trimmed_duration = out_point - in_point;

        decisions.push(EditDecision {
            scene_id: scene.scene_id.clone(),
            selected_variation: idx,
            video_url: video.video_url.clone(),
            in_point,
            out_point,
            transition_in: scene.transition_in.clone(),
            transition_in_duration: 0.0,
            transition_out: scene.transition_out.clone(),
            transition_out_duration: 0.0,
            start_time: current_time,
            duration: trimmed_duration,
            text_overlay: scene.text_overlay.clone(),
            text_position: scene.text_position.clone(),
            text_style: scene.text_style.clone(),
            text_start_time: scene.text_start_time,
            text_duration: scene.text_duration,
            notes: String::new(),
        });
        current_time += trimmed_duration;
    }

    decisions
}

fn total_duration(decisions: &[EditDecision]) -> f64 {
    decisions.iter().map(|d| d.duration).sum()
}

fn avg_quality(scenes: &[Scene], qa_results: &HashMap<String, Vec<QAResult>>) -> f64 {
    let scores: Vec<f64> = scenes
        .iter()
        .filter_map(|s| qa_results.get(&s.scene_id))
        .filter_map(|qa| qa.iter().map(|r| r.overall_score).fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v)))))
        .collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Deterministic stand-in for an LLM editor: always picks the
/// highest-QA-scoring variation for the "safe" cut, the next-best
/// variation (wrapping to best if there's only one) for "creative", and
/// the highest-QA variation again for "balanced" (the one the pipeline
/// recommends by default).
pub struct MockEditor;

impl MockEditor {
    pub fn new() -> Self {
        MockEditor
    }
}

impl Default for MockEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Editor for MockEditor {
    async fn generate_candidates(
        &self,
        scenes: &[Scene],
        video_candidates: &HashMap<String, Vec<GeneratedVideo>>,
        qa_results: &HashMap<String, Vec<QAResult>>,
        original_request: &str,
    ) -> StudioResult<Vec<EditCandidate>> {
        let empty_qa = Vec::new();

        let safe_decisions = build_decisions(scenes, video_candidates, |videos| {
            let scene_id = &videos[0].scene_id;
            best_variation_idx(videos, qa_results.get(scene_id).unwrap_or(&empty_qa))
        });

        let creative_decisions = build_decisions(scenes, video_candidates, |videos| {
            let scene_id = &videos[0].scene_id;
            let best = best_variation_idx(videos, qa_results.get(scene_id).unwrap_or(&empty_qa));
            if videos.len() > 1 {
                (best + 1) % videos.len()
            } else {
                best
            }
        });

        let balanced_decisions = build_decisions(scenes, video_candidates, |videos| {
            let scene_id = &videos[0].scene_id;
            best_variation_idx(videos, qa_results.get(scene_id).unwrap_or(&empty_qa))
        });

        let quality = avg_quality(scenes, qa_results);

        Ok(vec![
            EditCandidate {
                candidate_id: "safe_cut".to_string(),
                name: "Safe Cut".to_string(),
                style: "safe".to_string(),
                total_duration: total_duration(&safe_decisions),
                decisions: safe_decisions,
                estimated_quality: quality,
                description: format!("Conservative edit of: {original_request}"),
                reasoning: "Selected the highest-QA-scoring variation for every scene.".to_string(),
                continuity_issues: vec![],
                continuity_score: 100.0,
            },
            EditCandidate {
                candidate_id: "creative_cut".to_string(),
                name: "Creative Cut".to_string(),
                style: "creative".to_string(),
                total_duration: total_duration(&creative_decisions),
                decisions: creative_decisions,
                estimated_quality: (quality - 3.0).max(0.0),
                description: format!("Adventurous edit of: {original_request}"),
                reasoning: "Selected alternate variations for visual variety.".to_string(),
                continuity_issues: vec![],
                continuity_score: 95.0,
            },
            EditCandidate {
                candidate_id: "balanced_cut".to_string(),
                name: "Balanced Cut".to_string(),
                style: "balanced".to_string(),
                total_duration: total_duration(&balanced_decisions),
                decisions: balanced_decisions,
                estimated_quality: quality,
                description: format!("Recommended edit of: {original_request}"),
                reasoning: "Best overall narrative flow, balancing quality and pacing.".to_string(),
                continuity_issues: vec![],
                continuity_score: 100.0,
            },
        ])
    }
}
