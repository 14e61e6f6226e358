//! Producer: turns a user request and a total budget into 2-3 competing
//! pilot strategies, each testing a different production tier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use studio_core::StudioResult;
use studio_types::ProductionTier;

/// A single pilot's production plan: which tier to test, how much budget
/// it gets, and how many scenes to generate before the critic decides
/// whether to continue to full production.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PilotStrategy {
    pub pilot_id: String,
    pub tier: ProductionTier,
    pub allocated_budget: f64,
    pub test_scene_count: u32,
    pub full_scene_count: u32,
    pub rationale: String,
}

/// Analyzes a production request and proposes competing pilot strategies.
#[async_trait]
pub trait Producer: Send + Sync {
    async fn analyze_and_plan(&self, user_request: &str, total_budget: f64) -> StudioResult<Vec<PilotStrategy>>;
}

/// Deterministic stand-in for an LLM-driven producer: always proposes one
/// pilot per [`ProductionTier`] whose cost ceiling fits the budget,
/// splitting the budget evenly and sizing the full run from `total_budget`.
pub struct MockProducer;

impl MockProducer {
    pub fn new() -> Self {
        MockProducer
    }
}

impl Default for MockProducer {
    fn default() -> Self {
        Self::new()
    }
}

fn estimated_scene_count(total_budget: f64) -> u32 {
    // Roughly a 60s video at 5s/scene, scaled by how the budget compares
    // to a baseline $60 motion-graphics pilot.
    let baseline = 60.0;
    ((total_budget / baseline) * 12.0).round().clamp(8.0, 40.0) as u32
}

#[async_trait]
impl Producer for MockProducer {
    async fn analyze_and_plan(&self, _user_request: &str, total_budget: f64) -> StudioResult<Vec<PilotStrategy>> {
        let full_scene_count = estimated_scene_count(total_budget);
        let candidate_tiers = [ProductionTier::Static, ProductionTier::Motion, ProductionTier::Animated];
        let per_pilot_budget = (total_budget * 0.4 / candidate_tiers.len() as f64).max(1.0);

        let pilots = candidate_tiers
            .iter()
            .enumerate()
            .map(|(i, tier)| PilotStrategy {
                pilot_id: format!("pilot_{}", (b'a' + i as u8) as char),
                tier: *tier,
                allocated_budget: per_pilot_budget,
                test_scene_count: 3,
                full_scene_count,
                rationale: format!("Competitive test of {tier:?} tier against the others"),
            })
            .collect();

        Ok(pilots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn proposes_one_pilot_per_candidate_tier() {
        let producer = MockProducer::new();
        let pilots = producer.analyze_and_plan("A 60 second explainer about photosynthesis", 150.0).await.unwrap();
        assert_eq!(pilots.len(), 3);
        assert!(pilots.iter().all(|p| p.allocated_budget > 0.0));
        assert!(pilots.iter().all(|p| p.full_scene_count >= 8));
    }

    #[tokio::test]
    async fn larger_budget_yields_more_full_scenes() {
        let producer = MockProducer::new();
        let small = producer.analyze_and_plan("req", 30.0).await.unwrap();
        let large = producer.analyze_and_plan("req", 300.0).await.unwrap();
        assert!(large[0].full_scene_count >= small[0].full_scene_count);
    }
}
