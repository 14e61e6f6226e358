//! Director of Photography: deterministic (no LLM call) assignment of a
//! display mode and visual-direction hint to every segment of a structured
//! script, gated by a budget tier's image ratio.

use studio_types::{AssetType, DisplayMode, SegmentIntent};

use crate::content_library::ContentLibrary;
use crate::script::{ScriptSegment, StructuredScript};

/// Per-tier DALL-E allocation knobs. `image_ratio` is the fraction of
/// non-figure, non-transition segments that get a generated/sourced image;
/// `text_overlay_all` short-circuits every remaining segment to
/// `text_only` regardless of `image_ratio` (the micro tier).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetTierConfig {
    pub image_ratio: f64,
    pub text_overlay_all: bool,
}

/// Named budget tiers the DoP can plan against, distinct from
/// [`studio_types::ProductionTier`] — this tier governs *visual density*,
/// not generation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DopBudgetTier {
    Micro,
    Low,
    Medium,
    High,
    Full,
}

pub fn tier_config(tier: DopBudgetTier) -> BudgetTierConfig {
    match tier {
        DopBudgetTier::Micro => BudgetTierConfig {
            image_ratio: 0.0,
            text_overlay_all: true,
        },
        DopBudgetTier::Low => BudgetTierConfig {
            image_ratio: 0.10,
            text_overlay_all: false,
        },
        DopBudgetTier::Medium => BudgetTierConfig {
            image_ratio: 0.27,
            text_overlay_all: false,
        },
        DopBudgetTier::High => BudgetTierConfig {
            image_ratio: 0.50,
            text_overlay_all: false,
        },
        DopBudgetTier::Full => BudgetTierConfig {
            image_ratio: 1.0,
            text_overlay_all: false,
        },
    }
}

/// Intents that tend to discuss concrete, searchable real-world concepts —
/// these prefer a sourced web image over a DALL-E generation.
const WEB_IMAGE_INTENTS: &[SegmentIntent] = &[
    SegmentIntent::Context,
    SegmentIntent::Explanation,
    SegmentIntent::Evidence,
    SegmentIntent::DataWalkthrough,
    SegmentIntent::Narrative,
    SegmentIntent::Comparison,
];

/// Intents that are abstract/editorial — better suited to a DALL-E
/// generation than a web search.
const GENERATED_IMAGE_INTENTS: &[SegmentIntent] = &[
    SegmentIntent::Intro,
    SegmentIntent::Outro,
    SegmentIntent::Commentary,
    SegmentIntent::Speculation,
    SegmentIntent::Question,
    SegmentIntent::Synthesis,
];

fn should_use_web_image(seg: &ScriptSegment) -> bool {
    if WEB_IMAGE_INTENTS.contains(&seg.intent) {
        return true;
    }
    if GENERATED_IMAGE_INTENTS.contains(&seg.intent) {
        return false;
    }
    if seg.key_concepts.len() >= 2 {
        return true;
    }
    true
}

/// Assigns a `display_mode` (and `visual_direction`, `visual_asset_id`
/// where applicable) to every segment of `script`, mutating it in place.
/// Deterministic: re-running on unchanged inputs is a no-op.
pub fn assign_visuals(script: &mut StructuredScript, library: &ContentLibrary, budget_tier: DopBudgetTier) {
    let config = tier_config(budget_tier);

    // Phase 1: figure_sync always wins, regardless of tier.
    for seg in script.segments.iter_mut() {
        if !seg.figure_refs.is_empty() && seg.display_mode.is_none() {
            assign_figure_sync(seg, library);
        }
    }

    // Phase 2: micro tier sends everything else to text_only.
    if config.text_overlay_all {
        for seg in script.segments.iter_mut() {
            if seg.display_mode.is_none() {
                seg.display_mode = Some(DisplayMode::TextOnly);
                seg.visual_direction.clear();
            }
        }
        return;
    }

    // Phase 3: DALL-E budget, counted against the total segment count
    // (figures don't compete against it).
    let total_segments = script.segments.len();
    let dalle_budget = if config.image_ratio > 0.0 {
        ((total_segments as f64 * config.image_ratio) as usize).max(1)
    } else {
        0
    };

    // Phase 4: transitions always fall to text_only.
    for seg in script.segments.iter_mut() {
        if seg.display_mode.is_none() && seg.intent == SegmentIntent::Transition {
            seg.display_mode = Some(DisplayMode::TextOnly);
        }
    }

    // Phase 5: sort remaining unassigned segments by (has-approved-asset
    // desc, importance desc) and assign the top-K to dall_e/web_image.
    let mut remaining_idx: Vec<u32> = script
        .segments
        .iter()
        .filter(|s| s.display_mode.is_none())
        .map(|s| s.idx)
        .collect();

    remaining_idx.sort_by(|a, b| {
        let seg_a = script.get_segment(*a).unwrap();
        let seg_b = script.get_segment(*b).unwrap();
        let has_a = library.has_approved_asset_for(*a, AssetType::Image);
        let has_b = library.has_approved_asset_for(*b, AssetType::Image);
        has_b
            .cmp(&has_a)
            .then(seg_b.importance_score.partial_cmp(&seg_a.importance_score).unwrap())
    });

    if dalle_budget > 0 {
        for (rank, idx) in remaining_idx.iter().enumerate() {
            let mode = if rank < dalle_budget {
                if let Some(existing) = library.get_approved_for_segment(*idx, AssetType::Image) {
                    let asset_id = existing.asset_id.clone();
                    let seg = script.get_segment_mut(*idx).unwrap();
                    seg.display_mode = Some(DisplayMode::DallE);
                    seg.visual_asset_id = Some(asset_id);
                    continue;
                }
                let seg = script.get_segment(*idx).unwrap();
                if should_use_web_image(seg) {
                    DisplayMode::WebImage
                } else {
                    DisplayMode::DallE
                }
            } else {
                DisplayMode::CarryForward
            };
            script.get_segment_mut(*idx).unwrap().display_mode = Some(mode);
        }
    } else {
        for idx in &remaining_idx {
            script.get_segment_mut(*idx).unwrap().display_mode = Some(DisplayMode::CarryForward);
        }
    }

    // Phase 6: synthesize visual direction for visual-bearing modes.
    let figure_inventory = script.figure_inventory.clone();
    for seg in script.segments.iter_mut() {
        let needs_direction = matches!(
            seg.display_mode,
            Some(DisplayMode::DallE) | Some(DisplayMode::WebImage) | Some(DisplayMode::FigureSync)
        );
        if needs_direction && seg.visual_direction.is_empty() {
            seg.visual_direction = generate_visual_direction(seg, &figure_inventory);
        }
    }
}

fn assign_figure_sync(seg: &mut ScriptSegment, library: &ContentLibrary) {
    seg.display_mode = Some(DisplayMode::FigureSync);
    for figure_num in &seg.figure_refs {
        if let Some(existing) = library
            .query(&crate::content_library::AssetQuery {
                asset_type: Some(AssetType::Figure),
                status: Some(studio_types::AssetStatus::Approved),
                figure_number: Some(*figure_num),
                ..Default::default()
            })
            .into_iter()
            .next()
        {
            seg.visual_asset_id = Some(existing.asset_id.clone());
            break;
        }
    }
}

fn intent_direction_template(intent: SegmentIntent, figure_refs: &[u32]) -> String {
    use SegmentIntent::*;
    match intent {
        Intro => "Title card or establishing image. Use minimalist design with focus on main theme.".to_string(),
        Transition => "Subtle, transitional imagery. Fade/dissolve on carry-forward.".to_string(),
        Recap => "Montage or summary visual that echoes or callbacks to earlier points.".to_string(),
        Outro => "End card or closing visual with strong composition.".to_string(),
        Context => "Conceptual illustration of foundational concepts or prior work.".to_string(),
        Explanation => "Technical architectural diagram or system flowchart.".to_string(),
        Definition => "Clean, focused visual defining the term or concept.".to_string(),
        Narrative => "Scene illustration or B-roll style imagery.".to_string(),
        Claim => "Text overlay highlighting the key assertion.".to_string(),
        Evidence => "Source document, quote overlay, or supporting data visualization.".to_string(),
        DataWalkthrough => "Chart, table, or data visualization with clear axis labels.".to_string(),
        FigureReference => format!(
            "Frame or synchronize with Figure {}. Position for narration sync.",
            figure_refs.first().copied().map(|n| n.to_string()).unwrap_or_else(|| "?".to_string())
        ),
        Analysis => "Interpretive visualization showing insights.".to_string(),
        Comparison => "Side-by-side or split screen visualization showing relative performance.".to_string(),
        Counterpoint => "Visual contrast or different color treatment.".to_string(),
        Synthesis => "Combined or merged visual bringing together multiple elements.".to_string(),
        Commentary => "Host avatar or professional narrator framing.".to_string(),
        Question => "Text overlay with the question prominently displayed.".to_string(),
        Speculation => "Abstract or futuristic visualization.".to_string(),
    }
}

fn generate_visual_direction(
    seg: &ScriptSegment,
    figure_inventory: &std::collections::HashMap<u32, crate::script::FigureInventory>,
) -> String {
    let mut hints = vec![intent_direction_template(seg.intent, &seg.figure_refs)];

    if !seg.key_concepts.is_empty() {
        let concepts = seg.key_concepts.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
        hints.push(format!("Key visual elements to represent: {concepts}"));
    }

    if seg.display_mode == Some(DisplayMode::FigureSync) {
        for fig_num in &seg.figure_refs {
            if let Some(inv) = figure_inventory.get(fig_num) {
                if !inv.caption.is_empty() {
                    let excerpt: String = inv.caption.chars().take(100).collect();
                    hints.push(format!("Sync with Figure {fig_num}: {excerpt}"));
                }
            }
        }
    }

    if seg.importance_score >= 0.8 {
        hints.push("High priority - ensure compelling and clear composition.".to_string());
    } else if seg.importance_score <= 0.3 {
        hints.push("Lower priority - simpler treatment acceptable.".to_string());
    }

    if seg.importance_score >= 0.6 && seg.display_mode == Some(DisplayMode::DallE) {
        hints.push("Suitable for Ken Burns slow zoom effect.".to_string());
    }

    hints.join(" ")
}

/// Per-mode segment counts, used to check DoP coverage invariants.
pub fn mode_counts(script: &StructuredScript) -> std::collections::HashMap<DisplayMode, usize> {
    let mut counts = std::collections::HashMap::new();
    for seg in &script.segments {
        if let Some(mode) = seg.display_mode {
            *counts.entry(mode).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_with_figure(idx_with_figure: u32, total: u32) -> StructuredScript {
        let mut segments = Vec::new();
        for idx in 0..total {
            segments.push(ScriptSegment {
                idx,
                text: format!("Segment {idx}"),
                intent: if idx == idx_with_figure {
                    SegmentIntent::FigureReference
                } else {
                    SegmentIntent::Context
                },
                figure_refs: if idx == idx_with_figure { vec![1] } else { vec![] },
                key_concepts: vec![],
                visual_direction: String::new(),
                estimated_duration_sec: Some(5.0),
                importance_score: 0.5,
                audio_file: None,
                actual_duration_sec: None,
                visual_asset_id: None,
                display_mode: None,
            });
        }
        StructuredScript {
            script_id: "s1".to_string(),
            trial_id: "t1".to_string(),
            version: 1,
            total_segments: segments.len(),
            segments,
            figure_inventory: Default::default(),
            total_estimated_duration_sec: total as f64 * 5.0,
            source_document: None,
            generation_prompt: None,
            created_at: None,
        }
    }

    #[test]
    fn every_segment_gets_a_mode_and_counts_sum_to_total() {
        let mut script = script_with_figure(3, 10);
        let library = ContentLibrary::new("proj");
        assign_visuals(&mut script, &library, DopBudgetTier::Medium);

        assert!(script.segments.iter().all(|s| s.display_mode.is_some()));
        let counts = mode_counts(&script);
        assert_eq!(counts.values().sum::<usize>(), 10);
    }

    #[test]
    fn figure_segment_always_gets_figure_sync_even_at_micro_tier() {
        let mut script = script_with_figure(3, 10);
        let library = ContentLibrary::new("proj");
        assign_visuals(&mut script, &library, DopBudgetTier::Micro);

        assert_eq!(script.segments[3].display_mode, Some(DisplayMode::FigureSync));
        for (idx, seg) in script.segments.iter().enumerate() {
            if idx != 3 {
                assert_eq!(seg.display_mode, Some(DisplayMode::TextOnly));
            }
        }
    }

    #[test]
    fn assignment_is_deterministic_across_reruns() {
        let mut script_a = script_with_figure(3, 12);
        let mut script_b = script_with_figure(3, 12);
        let library = ContentLibrary::new("proj");
        assign_visuals(&mut script_a, &library, DopBudgetTier::High);
        assign_visuals(&mut script_b, &library, DopBudgetTier::High);

        let modes_a: Vec<_> = script_a.segments.iter().map(|s| s.display_mode).collect();
        let modes_b: Vec<_> = script_b.segments.iter().map(|s| s.display_mode).collect();
        assert_eq!(modes_a, modes_b);
    }

    #[test]
    fn produces_a_mix_of_modes_on_a_rich_script() {
        let mut script = script_with_figure(3, 20);
        script.segments[7].intent = SegmentIntent::Transition;
        script.segments[7].figure_refs.clear();
        let library = ContentLibrary::new("proj");
        assign_visuals(&mut script, &library, DopBudgetTier::Medium);

        let counts = mode_counts(&script);
        assert_eq!(script.segments[7].display_mode, Some(DisplayMode::TextOnly));
        assert!(counts.contains_key(&DisplayMode::CarryForward));
        assert!(counts.get(&DisplayMode::DallE).is_some() || counts.get(&DisplayMode::WebImage).is_some());
    }
}
