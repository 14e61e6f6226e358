//! Orchestrator (C9): runs the full competitive pilot pipeline end to
//! end — plan, test, critique, continue the winners, pick one.

use std::collections::HashMap;
use std::sync::Arc;

use studio_agents::{compare_pilots, Critic, Editor, GeneratedVideo, PilotResults, PilotStrategy, Producer, QAResult, Scene, SceneResult};
use studio_core::{BudgetLedger, StudioError, StudioResult};
use studio_wire::EditCandidate;
use tokio::sync::Semaphore;

use crate::pilot_runner::PilotRunner;

/// Final summary of one competitive production run.
#[derive(Debug, Clone)]
pub struct ProductionResult {
    pub status: String,
    pub best_pilot: Option<PilotResults>,
    pub all_pilots: Vec<PilotResults>,
    pub budget_used: f64,
    pub budget_remaining: f64,
    pub total_scenes: u32,
    pub edit_candidates: Vec<EditCandidate>,
}

impl ProductionResult {
    fn failed(reason: &str, budget_used: f64, budget_remaining: f64) -> Self {
        tracing::warn!(reason, "production run failed");
        ProductionResult {
            status: "failed".to_string(),
            best_pilot: None,
            all_pilots: Vec::new(),
            budget_used,
            budget_remaining,
            total_scenes: 0,
            edit_candidates: Vec::new(),
        }
    }
}

/// One successful pilot's merged test-phase-plus-continuation state,
/// carried between stages.
struct RunningPilot {
    strategy: PilotStrategy,
    scenes: Vec<Scene>,
    scene_results: Vec<SceneResult>,
    raw_videos: HashMap<String, Vec<GeneratedVideo>>,
    raw_qa: HashMap<String, Vec<QAResult>>,
}

/// Coordinates the Producer, Pilot Runner, Critic, and Editor collaborators
/// across the five fixed stages of a production run.
pub struct Orchestrator {
    producer: Arc<dyn Producer>,
    pilot_runner: Arc<PilotRunner>,
    critic: Arc<dyn Critic>,
    editor: Arc<dyn Editor>,
    max_concurrent_pilots: usize,
}

impl Orchestrator {
    pub fn new(producer: Arc<dyn Producer>, pilot_runner: Arc<PilotRunner>, critic: Arc<dyn Critic>, editor: Arc<dyn Editor>) -> Self {
        Self {
            producer,
            pilot_runner,
            critic,
            editor,
            max_concurrent_pilots: 3,
        }
    }

    pub fn with_max_concurrent_pilots(mut self, max_concurrent_pilots: usize) -> Self {
        self.max_concurrent_pilots = max_concurrent_pilots.max(1);
        self
    }

    pub async fn run(&self, user_request: &str, total_budget: f64) -> StudioResult<ProductionResult> {
        if user_request.trim().is_empty() {
            return Err(StudioError::InvalidInput("user_request must not be empty".to_string()));
        }
        if total_budget <= 0.0 {
            return Err(StudioError::InvalidInput(format!("total_budget must be positive, got {total_budget}")));
        }

        let ledger = Arc::new(BudgetLedger::new(total_budget));

        // Stage 1 — Plan.
        let pilots = self.producer.analyze_and_plan(user_request, total_budget).await?;
        if pilots.is_empty() {
            return Ok(ProductionResult::failed("producer returned zero pilots", 0.0, total_budget));
        }

        // Stage 2 — Parallel pilot tests, bounded by a semaphore.
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_pilots));
        let mut test_set = tokio::task::JoinSet::new();
        for pilot in pilots {
            let semaphore = Arc::clone(&semaphore);
            let pilot_runner = Arc::clone(&self.pilot_runner);
            let ledger = Arc::clone(&ledger);
            let user_request = user_request.to_string();
            test_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore not closed");
                let result = pilot_runner.run_test_phase(&pilot, &user_request, &ledger).await;
                (pilot, result)
            });
        }

        let mut running: Vec<RunningPilot> = Vec::new();
        while let Some(joined) = test_set.join_next().await {
            let Ok((pilot, result)) = joined else { continue };
            match result {
                Ok(run_result) if !run_result.scene_results.is_empty() => {
                    running.push(RunningPilot {
                        strategy: pilot,
                        scenes: run_result.scenes,
                        scene_results: run_result.scene_results,
                        raw_videos: run_result.raw_videos,
                        raw_qa: run_result.raw_qa,
                    });
                }
                Ok(_) => {
                    tracing::warn!(pilot_id = %pilot.pilot_id, "pilot test phase produced no scenes; dropped from winner selection");
                }
                Err(err) => {
                    tracing::warn!(pilot_id = %pilot.pilot_id, error = %err, "pilot test phase failed; dropped from winner selection");
                }
            }
        }

        if running.is_empty() {
            let used = ledger.get_total_spent().await;
            return Ok(ProductionResult::failed("no pilot produced a test result", used, ledger.get_remaining().await));
        }

        // Stage 3 — Parallel critic evaluation, same concurrency bound.
        let mut critic_set = tokio::task::JoinSet::new();
        for (idx, pilot) in running.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let critic = Arc::clone(&self.critic);
            let pilot_id = pilot.strategy.pilot_id.clone();
            let tier = pilot.strategy.tier;
            let scene_results = pilot.scene_results.clone();
            let total_cost = ledger.get_pilot_spent(&pilot_id).await;
            let budget_remaining = ledger.get_remaining().await;
            critic_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore not closed");
                let verdict = critic.evaluate_pilot(&pilot_id, tier, &scene_results, total_cost, budget_remaining).await;
                (idx, verdict)
            });
        }

        let mut verdicts: HashMap<usize, PilotResults> = HashMap::new();
        while let Some(joined) = critic_set.join_next().await {
            if let Ok((idx, Ok(verdict))) = joined {
                verdicts.insert(idx, verdict);
            }
        }

        let mut approved: Vec<(usize, PilotResults)> = verdicts.into_iter().filter(|(_, v)| v.approved).collect();
        if approved.is_empty() {
            let used = ledger.get_total_spent().await;
            return Ok(ProductionResult::failed("no pilot was approved by the critic", used, ledger.get_remaining().await));
        }

        // Stage 4 — Continue approved pilots, first-served by descending critic_score.
        approved.sort_by(|a, b| b.1.critic_score.partial_cmp(&a.1.critic_score).unwrap_or(std::cmp::Ordering::Equal));

        let mut final_results: HashMap<usize, PilotResults> = HashMap::new();

        for (idx, verdict) in &approved {
            if ledger.get_remaining().await <= 0.0 {
                tracing::info!("global budget exhausted; no further pilots scheduled for continuation");
                final_results.insert(*idx, verdict.clone());
                continue;
            }

            let remaining_scene_count = {
                let running_pilot = &running[*idx];
                running_pilot.strategy.full_scene_count.saturating_sub(running_pilot.strategy.test_scene_count)
            };

            let cap = verdict.budget_remaining.min(ledger.get_remaining().await);
            if remaining_scene_count == 0 || cap <= 0.0 {
                final_results.insert(*idx, verdict.clone());
                continue;
            }

            let pilot_id = running[*idx].strategy.pilot_id.clone();
            let test_scene_count = running[*idx].strategy.test_scene_count;
            let already_spent = ledger.get_pilot_spent(&pilot_id).await;
            let mut continuation_strategy = running[*idx].strategy.clone();
            continuation_strategy.allocated_budget = already_spent + cap;

            let continuation = self
                .pilot_runner
                .run_continuation(&continuation_strategy, user_request, remaining_scene_count, test_scene_count, &ledger)
                .await;

            match continuation {
                Ok(continuation_result) => {
                    let running_pilot = &mut running[*idx];
                    running_pilot.scenes.extend(continuation_result.scenes);
                    running_pilot.scene_results.extend(continuation_result.scene_results);
                    running_pilot.raw_videos.extend(continuation_result.raw_videos);
                    running_pilot.raw_qa.extend(continuation_result.raw_qa);

                    let avg_qa_score = if running_pilot.scene_results.is_empty() {
                        0.0
                    } else {
                        running_pilot.scene_results.iter().map(|s| s.qa_score).sum::<f64>() / running_pilot.scene_results.len() as f64
                    };

                    let mut merged_verdict = verdict.clone();
                    merged_verdict.scenes_generated = running_pilot.scene_results.len() as u32;
                    merged_verdict.avg_qa_score = avg_qa_score;
                    merged_verdict.total_cost = ledger.get_pilot_spent(&pilot_id).await;
                    final_results.insert(*idx, merged_verdict);
                }
                Err(err) => {
                    tracing::warn!(pilot_id = %pilot_id, error = %err, "pilot continuation failed; keeping test-phase results");
                    final_results.insert(*idx, verdict.clone());
                }
            }
        }

        let all_pilots: Vec<PilotResults> = final_results.into_values().collect();

        // Stage 5 — Winner selection.
        let best_pilot = compare_pilots(&all_pilots).cloned();

        let total_scenes = all_pilots.iter().map(|p| p.scenes_generated).sum();
        let budget_used = ledger.get_total_spent().await;
        let budget_remaining = ledger.get_remaining().await;

        let edit_candidates = match &best_pilot {
            Some(winner) => match running.iter().find(|p| p.strategy.pilot_id == winner.pilot_id) {
                Some(winner_pilot) => self
                    .editor
                    .generate_candidates(&winner_pilot.scenes, &winner_pilot.raw_videos, &winner_pilot.raw_qa, user_request)
                    .await
                    .unwrap_or_default(),
                None => Vec::new(),
            },
            None => Vec::new(),
        };

        Ok(ProductionResult {
            status: "completed".to_string(),
            best_pilot,
            all_pilots,
            budget_used,
            budget_remaining,
            total_scenes,
            edit_candidates,
        })
    }
}
