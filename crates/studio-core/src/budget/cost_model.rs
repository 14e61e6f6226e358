use studio_types::ProductionTier;

/// Per-tier cost and quality figures. Cost and quality ceiling both
/// strictly increase with tier — `Static` is the cheapest/lowest ceiling,
/// `Photorealistic` the most expensive/highest ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub tier: ProductionTier,
    pub cost_per_second: f64,
    pub cost_per_variation: f64,
    pub claude_tokens_estimate: u64,
    pub quality_ceiling: f64,
}

pub fn cost_model(tier: ProductionTier) -> CostModel {
    match tier {
        ProductionTier::Static => CostModel {
            tier,
            cost_per_second: 0.04,
            cost_per_variation: 0.02,
            claude_tokens_estimate: 5_000,
            quality_ceiling: 75.0,
        },
        ProductionTier::Motion => CostModel {
            tier,
            cost_per_second: 0.15,
            cost_per_variation: 0.10,
            claude_tokens_estimate: 8_000,
            quality_ceiling: 85.0,
        },
        ProductionTier::Animated => CostModel {
            tier,
            cost_per_second: 0.25,
            cost_per_variation: 0.20,
            claude_tokens_estimate: 10_000,
            quality_ceiling: 90.0,
        },
        ProductionTier::Photorealistic => CostModel {
            tier,
            cost_per_second: 0.50,
            cost_per_variation: 0.40,
            claude_tokens_estimate: 15_000,
            quality_ceiling: 95.0,
        },
    }
}

/// Breakdown of an estimated production cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub video_generation: f64,
    pub claude_api: f64,
    pub failure_buffer: f64,
    pub total: f64,
    pub cost_per_scene: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Estimates realistic production cost with a breakdown, including a 20%
/// failure-retry buffer on video generation and a Claude Sonnet-rate
/// estimate for prompt/QA overhead tokens.
pub fn estimate_realistic_cost(
    tier: ProductionTier,
    num_scenes: u32,
    num_variations: u32,
    avg_scene_duration: f64,
    include_overhead: bool,
) -> CostEstimate {
    let model = cost_model(tier);

    let total_seconds = num_scenes as f64 * avg_scene_duration * num_variations as f64;
    let video_cost = total_seconds * model.cost_per_second;

    let claude_cost = if include_overhead {
        let total_tokens = model.claude_tokens_estimate as f64 * num_scenes as f64;
        (total_tokens * 0.003 / 1000.0) + (total_tokens * 0.5 * 0.015 / 1000.0)
    } else {
        0.0
    };

    let failure_buffer = video_cost * 0.20;
    let total = video_cost + claude_cost + failure_buffer;
    let cost_per_scene = if num_scenes > 0 {
        total / num_scenes as f64
    } else {
        0.0
    };

    CostEstimate {
        video_generation: round2(video_cost),
        claude_api: round2(claude_cost),
        failure_buffer: round2(failure_buffer),
        total: round2(total),
        cost_per_scene: round2(cost_per_scene),
    }
}

/// Depth of audio production, governing `estimate_audio_cost`'s multiplier.
pub fn audio_cost_multiplier(tier: studio_types::AudioProductionTier) -> f64 {
    use studio_types::AudioProductionTier::*;
    match tier {
        None => 0.0,
        MusicOnly => 0.3,
        SimpleOverlay => 0.6,
        TimeSynced => 1.0,
        FullProduction => 1.5,
    }
}

/// Estimates audio production cost for a total narration duration at a
/// given audio production tier, at a flat per-second base rate.
pub fn estimate_audio_cost(tier: studio_types::AudioProductionTier, total_duration_sec: f64) -> f64 {
    const BASE_RATE_PER_SECOND: f64 = 0.03;
    round2(total_duration_sec * BASE_RATE_PER_SECOND * audio_cost_multiplier(tier))
}

/// Cost of producing a single scene's variations: duration times
/// variation count times the tier's per-second rate.
pub fn estimate_scene_cost(tier: ProductionTier, duration_sec: f64, num_variations: u32) -> f64 {
    let model = cost_model(tier);
    round2(duration_sec * num_variations as f64 * model.cost_per_second)
}

/// Estimates the cost of a pilot's test phase: video generation for its
/// test scenes plus a flat Claude prompting cost, no failure buffer. This
/// is a tighter, pre-generation estimate than [`estimate_realistic_cost`],
/// used to decide whether a pilot can even be started.
pub fn estimate_pilot_test_cost(
    tier: ProductionTier,
    test_scene_count: u32,
    num_variations: u32,
    avg_duration_per_scene: f64,
) -> f64 {
    let model = cost_model(tier);

    let video_cost =
        test_scene_count as f64 * avg_duration_per_scene * num_variations as f64 * model.cost_per_second;

    let claude_cost = model.claude_tokens_estimate as f64 * test_scene_count as f64 * 0.003 / 1000.0;

    round2(video_cost + claude_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_is_monotonic_in_cost_and_quality() {
        let tiers = ProductionTier::ALL;
        for pair in tiers.windows(2) {
            let lo = cost_model(pair[0]);
            let hi = cost_model(pair[1]);
            assert!(hi.cost_per_second > lo.cost_per_second);
            assert!(hi.cost_per_variation > lo.cost_per_variation);
            assert!(hi.quality_ceiling > lo.quality_ceiling);
        }
    }

    #[test]
    fn estimate_matches_known_static_tier_breakdown() {
        let estimate = estimate_realistic_cost(ProductionTier::Static, 10, 3, 5.0, true);
        // 10 scenes * 5s * 3 variations = 150s video at $0.04/s = $6.00
        assert_eq!(estimate.video_generation, 6.0);
        assert_eq!(estimate.failure_buffer, 1.2);
    }

    #[test]
    fn zero_scenes_does_not_panic() {
        let estimate = estimate_realistic_cost(ProductionTier::Motion, 0, 3, 5.0, true);
        assert_eq!(estimate.cost_per_scene, 0.0);
    }

    #[test]
    fn scene_cost_scales_with_variations() {
        let one = estimate_scene_cost(ProductionTier::Animated, 5.0, 1);
        let three = estimate_scene_cost(ProductionTier::Animated, 5.0, 3);
        assert_eq!(three, one * 3.0);
    }

    #[test]
    fn pilot_test_cost_matches_known_breakdown() {
        // 3 test scenes * 5s * 3 variations = 45s video at $0.15/s = $6.75
        // claude: 8000 tokens * 3 scenes * 0.003/1000 = $0.072
        let cost = estimate_pilot_test_cost(ProductionTier::Motion, 3, 3, 5.0);
        assert_eq!(cost, 6.82);
    }
}
