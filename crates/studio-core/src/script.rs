use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use studio_types::{DisplayMode, SegmentIntent};

/// A figure available from the knowledge base for this script.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureInventory {
    /// The "Figure N" number as it appears in the source material.
    pub figure_number: u32,
    pub kb_path: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub discussed_in_segments: Vec<u32>,
}

/// A single segment of the structured script — one paragraph of narration
/// plus everything the DoP and downstream agents need about it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptSegment {
    pub idx: u32,
    pub text: String,
    pub intent: SegmentIntent,
    #[serde(default)]
    pub figure_refs: Vec<u32>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub visual_direction: String,
    pub estimated_duration_sec: Option<f64>,
    pub importance_score: f64,
    pub audio_file: Option<String>,
    pub actual_duration_sec: Option<f64>,
    pub visual_asset_id: Option<String>,
    pub display_mode: Option<DisplayMode>,
}

/// The single source of truth for a production: an ordered list of
/// segments plus the figures available from the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredScript {
    pub script_id: String,
    pub trial_id: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub segments: Vec<ScriptSegment>,
    #[serde(default)]
    pub figure_inventory: HashMap<u32, FigureInventory>,
    #[serde(default)]
    pub total_segments: usize,
    #[serde(default)]
    pub total_estimated_duration_sec: f64,
    pub source_document: Option<String>,
    pub generation_prompt: Option<String>,
    pub created_at: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl StructuredScript {
    pub fn get_figure_segments(&self) -> Vec<&ScriptSegment> {
        self.segments.iter().filter(|s| !s.figure_refs.is_empty()).collect()
    }

    pub fn get_segments_by_intent(&self, intent: SegmentIntent) -> Vec<&ScriptSegment> {
        self.segments.iter().filter(|s| s.intent == intent).collect()
    }

    pub fn get_segment(&self, idx: u32) -> Option<&ScriptSegment> {
        self.segments.iter().find(|s| s.idx == idx)
    }

    pub fn get_segment_mut(&mut self, idx: u32) -> Option<&mut ScriptSegment> {
        self.segments.iter_mut().find(|s| s.idx == idx)
    }

    pub fn to_flat_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Parses a flat script (paragraphs separated by a blank line) into a
    /// `StructuredScript`, classifying each paragraph's intent and scoring
    /// its importance deterministically, with no LLM involved.
    pub fn from_flat_text(
        script_text: &str,
        trial_id: &str,
        kb_figures: Option<&HashMap<u32, String>>,
    ) -> Self {
        let paragraphs: Vec<&str> = script_text
            .split("\n\n")
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();

        let figure_pattern = Regex::new(r"(?i)figure\s+(\d+)").expect("static pattern is valid");
        let total = paragraphs.len();

        let mut segments = Vec::with_capacity(total);
        let mut figure_mentions: HashMap<u32, Vec<u32>> = HashMap::new();

        for (idx, para) in paragraphs.iter().enumerate() {
            let idx = idx as u32;
            let figure_refs: Vec<u32> = figure_pattern
                .captures_iter(para)
                .filter_map(|c| c.get(1)?.as_str().parse().ok())
                .collect();

            for fig_num in &figure_refs {
                figure_mentions.entry(*fig_num).or_default().push(idx);
            }

            let intent = classify_intent(para, idx, total as u32, &figure_refs);
            let word_count = para.split_whitespace().count();
            let estimated_duration = (word_count as f64 / 150.0) * 60.0;
            let importance = calculate_importance(para, intent, &figure_refs);

            segments.push(ScriptSegment {
                idx,
                text: para.to_string(),
                intent,
                figure_refs,
                key_concepts: Vec::new(),
                visual_direction: String::new(),
                estimated_duration_sec: Some(estimated_duration),
                importance_score: importance,
                audio_file: None,
                actual_duration_sec: None,
                visual_asset_id: None,
                display_mode: None,
            });
        }

        let mut figure_inventory = HashMap::new();
        if let Some(kb_figures) = kb_figures {
            for (fig_num, kb_path) in kb_figures {
                figure_inventory.insert(
                    *fig_num,
                    FigureInventory {
                        figure_number: *fig_num,
                        kb_path: kb_path.clone(),
                        caption: String::new(),
                        description: String::new(),
                        discussed_in_segments: figure_mentions.get(fig_num).cloned().unwrap_or_default(),
                    },
                );
            }
        } else {
            for (fig_num, seg_indices) in &figure_mentions {
                figure_inventory.insert(
                    *fig_num,
                    FigureInventory {
                        figure_number: *fig_num,
                        kb_path: String::new(),
                        caption: String::new(),
                        description: String::new(),
                        discussed_in_segments: seg_indices.clone(),
                    },
                );
            }
        }

        let total_duration: f64 = segments.iter().filter_map(|s| s.estimated_duration_sec).sum();

        StructuredScript {
            script_id: format!("{trial_id}_v1"),
            trial_id: trial_id.to_string(),
            version: 1,
            total_segments: segments.len(),
            segments,
            figure_inventory,
            total_estimated_duration_sec: total_duration,
            source_document: None,
            generation_prompt: None,
            created_at: None,
        }
    }
}

/// Classifies a paragraph's intent from a fixed priority order: absolute
/// position (intro/outro) first, explicit figure references next, then
/// keyword matching across six intents (methodology, comparison,
/// key-finding, data, transition, context — in that order), then a
/// second-to-last recap fallback, then a neutral `Context` default. The
/// remaining intents in [`SegmentIntent`] are reachable only via direct
/// construction (e.g. a richer upstream classifier), not from flat text.
pub fn classify_intent(text: &str, idx: u32, total: u32, figure_refs: &[u32]) -> SegmentIntent {
    if idx == 0 {
        return SegmentIntent::Intro;
    }
    if idx == total.saturating_sub(1) {
        return SegmentIntent::Outro;
    }
    if !figure_refs.is_empty() {
        return SegmentIntent::FigureReference;
    }

    let text_lower = text.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| text_lower.contains(w));

    if any(&["methodology", "approach", "method", "algorithm", "technique"]) {
        return SegmentIntent::Explanation;
    }
    if any(&["compared", "versus", "vs.", "comparison", "better than", "outperforms"]) {
        return SegmentIntent::Comparison;
    }
    if any(&["results", "finding", "found", "shows", "demonstrates", "performance"]) {
        return SegmentIntent::Analysis;
    }
    if any(&["data", "dataset", "experiment", "evaluation", "metrics"]) {
        return SegmentIntent::DataWalkthrough;
    }
    if any(&["let's", "now", "moving", "turning", "next"]) {
        return SegmentIntent::Transition;
    }
    if any(&["context", "background", "history", "traditionally"]) {
        return SegmentIntent::Context;
    }

    if idx == total.saturating_sub(2) {
        return SegmentIntent::Recap;
    }

    SegmentIntent::Context
}

/// Computes a 0.0-1.0 importance score used to prioritize DALL-E image
/// allocation, boosted for figure references and longer segments.
pub fn calculate_importance(text: &str, intent: SegmentIntent, figure_refs: &[u32]) -> f64 {
    let mut score = intent_base_score(intent);

    if !figure_refs.is_empty() {
        score = (score + 0.2).min(1.0);
    }

    let word_count = text.split_whitespace().count();
    if word_count > 150 {
        score = (score + 0.1).min(1.0);
    }

    (score * 100.0).round() / 100.0
}

fn intent_base_score(intent: SegmentIntent) -> f64 {
    use SegmentIntent::*;
    match intent {
        Intro => 0.8,
        Outro => 0.6,
        Transition => 0.2,
        Recap => 0.5,
        Context => 0.4,
        Explanation => 0.7,
        Definition => 0.5,
        Narrative => 0.5,
        Claim => 0.7,
        Evidence => 0.75,
        DataWalkthrough => 0.6,
        FigureReference => 1.0,
        Analysis => 0.9,
        Comparison => 0.7,
        Counterpoint => 0.65,
        Synthesis => 0.75,
        Commentary => 0.45,
        Question => 0.55,
        Speculation => 0.4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_paragraphs_are_intro_and_outro() {
        let text = "Welcome to the show.\n\nSome middle content here.\n\nThanks for watching.";
        let script = StructuredScript::from_flat_text(text, "trial_1", None);
        assert_eq!(script.segments[0].intent, SegmentIntent::Intro);
        assert_eq!(script.segments.last().unwrap().intent, SegmentIntent::Outro);
    }

    #[test]
    fn figure_reference_takes_priority_over_keywords() {
        let text = "Intro.\n\nAs shown in Figure 3, the methodology clearly outperforms baselines.\n\nOutro.";
        let script = StructuredScript::from_flat_text(text, "trial_1", None);
        assert_eq!(script.segments[1].intent, SegmentIntent::FigureReference);
        assert_eq!(script.segments[1].figure_refs, vec![3]);
    }

    #[test]
    fn methodology_keywords_outrank_comparison_keywords() {
        let intent = classify_intent("Our approach outperforms the baseline.", 1, 5, &[]);
        assert_eq!(intent, SegmentIntent::Explanation);
    }

    #[test]
    fn importance_score_is_highest_for_figure_reference() {
        let score = calculate_importance("short text", SegmentIntent::FigureReference, &[3]);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn round_trip_json_is_identity() {
        let text = "Intro segment.\n\nMiddle segment about methodology and comparison.\n\nOutro segment.";
        let script = StructuredScript::from_flat_text(text, "trial_1", None);
        let json = serde_json::to_string(&script).unwrap();
        let restored: StructuredScript = serde_json::from_str(&json).unwrap();
        assert_eq!(script, restored);
    }
}
