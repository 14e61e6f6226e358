use serde::{Deserialize, Serialize};

/// Target format an [`EditCandidate`] can be rendered into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Json,
    Fcpxml,
    EdlCmx3600,
    Davinci,
    Premiere,
}

/// One cut in an edit sequence: a trimmed source clip placed at a point on
/// the timeline, with its surrounding transitions and optional text overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditDecision {
    pub scene_id: String,
    pub selected_variation: usize,
    pub video_url: String,
    pub in_point: f64,
    pub out_point: f64,
    pub transition_in: String,
    pub transition_in_duration: f64,
    pub transition_out: String,
    pub transition_out_duration: f64,
    pub start_time: f64,
    pub duration: f64,
    pub text_overlay: Option<String>,
    pub text_position: String,
    pub text_style: String,
    pub text_start_time: Option<f64>,
    pub text_duration: Option<f64>,
    pub notes: String,
}

/// One editorial take on the full cut: a named, ordered sequence of
/// [`EditDecision`]s plus the reasoning behind the choices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditCandidate {
    pub candidate_id: String,
    pub name: String,
    /// "safe", "creative", or "balanced".
    pub style: String,
    pub decisions: Vec<EditDecision>,
    pub total_duration: f64,
    pub estimated_quality: f64,
    pub description: String,
    pub reasoning: String,
    pub continuity_issues: Vec<String>,
    pub continuity_score: f64,
}

/// Human feedback on a candidate, used to drive a revision pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HumanFeedback {
    pub approved: bool,
    pub notes: String,
    pub requested_changes: Vec<String>,
    pub scenes_to_recut: Vec<String>,
    pub pacing_notes: String,
}

/// The full set of candidates produced for one production, with the
/// editor's recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditDecisionList {
    pub edl_id: String,
    pub project_name: String,
    pub candidates: Vec<EditCandidate>,
    pub recommended_candidate_id: Option<String>,
    pub export_formats: Vec<ExportFormat>,
    pub created_timestamp: String,
    pub total_scenes: usize,
    pub original_request: String,
}

impl EditDecisionList {
    /// Picks the candidate the editor recommends, preferring the
    /// "balanced" style and falling back to the highest estimated quality.
    pub fn select_recommended(candidates: &[EditCandidate]) -> Option<String> {
        if candidates.is_empty() {
            return None;
        }
        if let Some(balanced) = candidates.iter().find(|c| c.style == "balanced") {
            return Some(balanced.candidate_id.clone());
        }
        candidates
            .iter()
            .max_by(|a, b| {
                a.estimated_quality
                    .partial_cmp(&b.estimated_quality)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|c| c.candidate_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, style: &str, quality: f64) -> EditCandidate {
        EditCandidate {
            candidate_id: id.to_string(),
            name: id.to_string(),
            style: style.to_string(),
            decisions: vec![],
            total_duration: 0.0,
            estimated_quality: quality,
            description: String::new(),
            reasoning: String::new(),
            continuity_issues: vec![],
            continuity_score: 100.0,
        }
    }

    #[test]
    fn prefers_balanced_style() {
        let candidates = vec![
            candidate("safe_cut", "safe", 95.0),
            candidate("balanced_cut", "balanced", 80.0),
            candidate("creative_cut", "creative", 99.0),
        ];
        assert_eq!(
            EditDecisionList::select_recommended(&candidates),
            Some("balanced_cut".to_string())
        );
    }

    #[test]
    fn falls_back_to_highest_quality() {
        let candidates = vec![candidate("a", "safe", 70.0), candidate("b", "creative", 90.0)];
        assert_eq!(
            EditDecisionList::select_recommended(&candidates),
            Some("b".to_string())
        );
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert_eq!(EditDecisionList::select_recommended(&[]), None);
    }
}
