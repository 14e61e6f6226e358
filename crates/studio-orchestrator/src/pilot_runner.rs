//! Pilot Runner (C8): executes one pilot's test phase end-to-end within
//! its allocated sub-budget, wave by wave over an Execution Graph.

use std::collections::HashMap;
use std::sync::Arc;

use studio_agents::{
    ChainFrom, GeneratedVideo, PilotStrategy, QAResult, QAVerifier, Scene, SceneResult, ScriptWriter, VideoGenerator,
};
use studio_core::budget::estimate_scene_cost;
use studio_core::{build_execution_graph, BudgetLedger, ExecutionGraph, GraphStrategy, SceneGroup, SceneRef, StudioResult};
use studio_types::ExecutionMode;

/// The outcome of running one pilot's test phase.
#[derive(Debug, Clone)]
pub struct PilotRunResult {
    pub pilot_id: String,
    pub scenes: Vec<Scene>,
    pub scene_results: Vec<SceneResult>,
    pub budget_spent: f64,
    pub raw_videos: HashMap<String, Vec<GeneratedVideo>>,
    pub raw_qa: HashMap<String, Vec<QAResult>>,
}

/// Drives the ScriptWriter, VideoGenerator, and QAVerifier collaborators
/// for one pilot's test (or continuation) phase.
pub struct PilotRunner {
    script_writer: Arc<dyn ScriptWriter>,
    video_generator: Arc<dyn VideoGenerator>,
    qa_verifier: Arc<dyn QAVerifier>,
    graph_strategy: GraphStrategy,
    num_variations: u32,
}

impl PilotRunner {
    pub fn new(
        script_writer: Arc<dyn ScriptWriter>,
        video_generator: Arc<dyn VideoGenerator>,
        qa_verifier: Arc<dyn QAVerifier>,
    ) -> Self {
        Self {
            script_writer,
            video_generator,
            qa_verifier,
            graph_strategy: GraphStrategy::Auto,
            num_variations: 2,
        }
    }

    pub fn with_graph_strategy(mut self, strategy: GraphStrategy) -> Self {
        self.graph_strategy = strategy;
        self
    }

    pub fn with_num_variations(mut self, num_variations: u32) -> Self {
        self.num_variations = num_variations;
        self
    }

    /// Runs `pilot`'s test phase: writes `test_scene_count` scenes at
    /// `5.0s` each, schedules them over an Execution Graph, and records
    /// spend against `ledger` as each scene completes.
    pub async fn run_test_phase(&self, pilot: &PilotStrategy, user_request: &str, ledger: &BudgetLedger) -> StudioResult<PilotRunResult> {
        let test_duration = pilot.test_scene_count as f64 * 5.0;
        let scenes = self
            .script_writer
            .write_scenes(user_request, pilot.tier, test_duration, Some(pilot.test_scene_count))
            .await?;
        self.run_scenes(pilot, scenes, ledger).await
    }

    /// Runs the remaining scenes of a pilot that was approved to continue
    /// past its test phase. `scene_id_offset` numbers the continuation's
    /// scenes so they don't collide with the test phase's `scene_001..N`
    /// ids when the two SceneResult lists are later merged — pass the
    /// pilot's `test_scene_count`.
    pub async fn run_continuation(
        &self,
        pilot: &PilotStrategy,
        user_request: &str,
        remaining_scene_count: u32,
        scene_id_offset: u32,
        ledger: &BudgetLedger,
    ) -> StudioResult<PilotRunResult> {
        if remaining_scene_count == 0 {
            return Ok(PilotRunResult {
                pilot_id: pilot.pilot_id.clone(),
                scenes: Vec::new(),
                scene_results: Vec::new(),
                budget_spent: 0.0,
                raw_videos: HashMap::new(),
                raw_qa: HashMap::new(),
            });
        }
        let full_duration = pilot.full_scene_count as f64 * 5.0 - pilot.test_scene_count as f64 * 5.0;
        let mut scenes = self
            .script_writer
            .write_scenes(user_request, pilot.tier, full_duration, Some(remaining_scene_count))
            .await?;
        for (i, scene) in scenes.iter_mut().enumerate() {
            scene.scene_id = format!("scene_{:03}", scene_id_offset + i as u32 + 1);
        }
        self.run_scenes(pilot, scenes, ledger).await
    }

    async fn run_scenes(&self, pilot: &PilotStrategy, scenes: Vec<Scene>, ledger: &BudgetLedger) -> StudioResult<PilotRunResult> {
        let scene_refs: Vec<SceneRef> = scenes
            .iter()
            .map(|s| SceneRef {
                scene_id: s.scene_id.clone(),
                title: s.title.clone(),
                description: s.description.clone(),
                visual_elements: s.visual_elements.clone(),
                continuity_group: s.continuity_group.clone(),
            })
            .collect();

        let graph = build_execution_graph(&scene_refs, self.graph_strategy);
        let problems = graph.validate();
        if !problems.is_empty() {
            tracing::warn!(pilot_id = %pilot.pilot_id, ?problems, "execution graph has validation issues; proceeding best-effort");
        }

        let predecessors = scene_predecessors(&graph);
        let scenes_by_id: HashMap<String, Scene> = scenes.iter().map(|s| (s.scene_id.clone(), s.clone())).collect();

        let mut per_scene: HashMap<String, (Vec<GeneratedVideo>, Vec<QAResult>)> = HashMap::new();
        let mut best_video: HashMap<String, GeneratedVideo> = HashMap::new();
        let mut budget_exhausted = false;

        for wave in graph.get_execution_waves() {
            if budget_exhausted {
                break;
            }

            let mut join_set = tokio::task::JoinSet::new();

            for scene_id in &wave {
                let Some(scene) = scenes_by_id.get(scene_id) else { continue };

                let estimated_cost = estimate_scene_cost(pilot.tier, scene.duration, self.num_variations);
                let already_spent = ledger.get_pilot_spent(&pilot.pilot_id).await;
                if already_spent + estimated_cost > pilot.allocated_budget {
                    tracing::info!(
                        pilot_id = %pilot.pilot_id,
                        scene_id = %scene_id,
                        "allocated pilot budget would be exceeded; stopping further scene generation"
                    );
                    budget_exhausted = true;
                    break;
                }

                let chain_scene_id = predecessors.get(scene_id).cloned();
                let chain_video_url = chain_scene_id.as_ref().and_then(|id| best_video.get(id)).map(|v| v.video_url.clone());

                let scene = scene.clone();
                let tier = pilot.tier;
                let num_variations = self.num_variations;
                let video_generator = Arc::clone(&self.video_generator);
                let qa_verifier = Arc::clone(&self.qa_verifier);

                join_set.spawn(async move {
                    let chain_from = match (&chain_scene_id, &chain_video_url) {
                        (Some(id), Some(url)) => Some(ChainFrom { scene_id: id, video_url: url }),
                        _ => None,
                    };

                    let videos = video_generator
                        .generate_scene(&scene, tier, estimated_cost.max(0.01), num_variations, chain_from)
                        .await?;

                    if videos.is_empty() {
                        return Ok::<_, studio_core::StudioError>(None);
                    }

                    let mut qa_set = tokio::task::JoinSet::new();
                    for video in videos.clone() {
                        let qa_verifier = Arc::clone(&qa_verifier);
                        qa_set.spawn(async move {
                            let result = qa_verifier.verify(&video, tier).await;
                            (video, result)
                        });
                    }

                    let mut paired = Vec::new();
                    while let Some(joined) = qa_set.join_next().await {
                        if let Ok((video, Ok(qa))) = joined {
                            paired.push((video, qa));
                        }
                    }

                    Ok(Some((scene.scene_id, videos, paired)))
                });
            }

            while let Some(joined) = join_set.join_next().await {
                let Ok(Ok(Some((scene_id, videos, paired)))) = joined else {
                    continue;
                };
                if paired.is_empty() {
                    continue;
                }

                let generation_cost: f64 = videos.iter().map(|v| v.generation_cost).sum();
                ledger.record_spend(&pilot.pilot_id, generation_cost).await?;

                let best = paired
                    .iter()
                    .max_by(|(_, a), (_, b)| a.overall_score.partial_cmp(&b.overall_score).unwrap_or(std::cmp::Ordering::Equal))
                    .cloned();

                if let Some((best_video_item, _)) = &best {
                    best_video.insert(scene_id.clone(), best_video_item.clone());
                }

                let qa_results: Vec<QAResult> = paired.iter().map(|(_, qa)| qa.clone()).collect();
                per_scene.insert(scene_id, (videos, qa_results));
            }
        }

        let mut scene_results = Vec::new();
        let mut raw_videos = HashMap::new();
        let mut raw_qa = HashMap::new();

        for scene in &scenes {
            let Some((videos, qa_results)) = per_scene.remove(&scene.scene_id) else {
                continue;
            };

            let best_idx = qa_results
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.overall_score.partial_cmp(&b.overall_score).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(i, _)| i);

            if let Some(best_idx) = best_idx {
                let best_qa = &qa_results[best_idx];
                let generation_cost: f64 = videos.iter().map(|v| v.generation_cost).sum();
                scene_results.push(SceneResult {
                    scene_id: scene.scene_id.clone(),
                    description: scene.description.clone(),
                    video_url: best_qa.video_url.clone(),
                    qa_score: best_qa.overall_score,
                    generation_cost,
                    qa_passed: best_qa.passed,
                    qa_threshold: best_qa.threshold,
                    qa_issues: best_qa.issues.clone(),
                    qa_suggestions: best_qa.suggestions.clone(),
                });
            }

            raw_videos.insert(scene.scene_id.clone(), videos);
            raw_qa.insert(scene.scene_id.clone(), qa_results);
        }

        Ok(PilotRunResult {
            pilot_id: pilot.pilot_id.clone(),
            budget_spent: ledger.get_pilot_spent(&pilot.pilot_id).await,
            scenes,
            scene_results,
            raw_videos,
            raw_qa,
        })
    }
}

/// For every scene, the scene it should chain its generation from, derived
/// from the Execution Graph's sequential groups and `chain_from_*` links.
fn scene_predecessors(graph: &ExecutionGraph) -> HashMap<String, String> {
    let mut predecessors = HashMap::new();

    for group in &graph.groups {
        if group.mode != ExecutionMode::Sequential {
            continue;
        }

        let mut prior = first_predecessor(graph, group);
        for scene_id in &group.scene_ids {
            if let Some(prior_id) = prior {
                predecessors.insert(scene_id.clone(), prior_id);
            }
            prior = Some(scene_id.clone());
        }
    }

    predecessors
}

fn first_predecessor(graph: &ExecutionGraph, group: &SceneGroup) -> Option<String> {
    if let Some(chain_scene) = &group.chain_from_scene {
        return Some(chain_scene.clone());
    }
    if let Some(chain_group) = &group.chain_from_group {
        return graph.get_group(chain_group).and_then(|g| g.scene_ids.last().cloned());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_agents::{MockQAVerifier, MockScriptWriter, MockVideoGenerator};
    use studio_types::ProductionTier;

    fn pilot() -> PilotStrategy {
        PilotStrategy {
            pilot_id: "pilot_a".to_string(),
            tier: ProductionTier::Motion,
            allocated_budget: 100.0,
            test_scene_count: 3,
            full_scene_count: 10,
            rationale: String::new(),
        }
    }

    fn runner() -> PilotRunner {
        PilotRunner::new(Arc::new(MockScriptWriter::new()), Arc::new(MockVideoGenerator::new()), Arc::new(MockQAVerifier::new()))
    }

    #[tokio::test]
    async fn test_phase_produces_one_scene_result_per_scene() {
        let ledger = BudgetLedger::new(100.0);
        let result = runner().run_test_phase(&pilot(), "an explainer about tides", &ledger).await.unwrap();
        assert_eq!(result.scene_results.len(), 3);
        assert!(result.budget_spent > 0.0);
    }

    #[tokio::test]
    async fn scene_results_preserve_script_writer_order() {
        let ledger = BudgetLedger::new(100.0);
        let result = runner().run_test_phase(&pilot(), "an explainer about tides", &ledger).await.unwrap();
        let ids: Vec<&str> = result.scene_results.iter().map(|s| s.scene_id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn tiny_allocated_budget_yields_partial_results() {
        let mut tight_pilot = pilot();
        tight_pilot.allocated_budget = 0.01;
        let ledger = BudgetLedger::new(100.0);
        let result = runner().run_test_phase(&tight_pilot, "an explainer about tides", &ledger).await.unwrap();
        assert!(result.scene_results.len() < 3);
    }
}
