//! Execution Graph: groups a flat scene list into parallel/sequential
//! scheduling waves that respect continuity dependencies.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use studio_types::ExecutionMode;

/// Minimal view of a scene the graph builder needs — just enough to drive
/// the `auto` keyword heuristics and `manual` continuity-group grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRef {
    pub scene_id: String,
    pub title: String,
    pub description: String,
    pub visual_elements: Vec<String>,
    pub continuity_group: Option<String>,
}

/// A set of scenes that share a scheduling mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneGroup {
    pub group_id: String,
    pub scene_ids: Vec<String>,
    pub mode: ExecutionMode,
    pub chain_from_group: Option<String>,
    pub chain_from_scene: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Strategy used to partition scenes into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStrategy {
    AllParallel,
    AllSequential,
    Manual,
    Auto,
}

/// The ordered set of scene groups for one pilot run. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExecutionGraph {
    pub groups: Vec<SceneGroup>,
}

impl ExecutionGraph {
    pub fn get_group(&self, group_id: &str) -> Option<&SceneGroup> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }

    pub fn get_scene_group(&self, scene_id: &str) -> Option<&SceneGroup> {
        self.groups.iter().find(|g| g.scene_ids.iter().any(|s| s == scene_id))
    }

    pub fn all_scene_ids(&self) -> Vec<String> {
        self.groups.iter().flat_map(|g| g.scene_ids.clone()).collect()
    }

    /// Validates structural soundness: duplicate scene ids, dangling chain
    /// references, and cyclic `chain_from_group` chains. Never panics;
    /// returns the list of problems found (empty means valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        let all_scenes = self.all_scene_ids();
        for scene_id in &all_scenes {
            if !seen.insert(scene_id.clone()) {
                errors.push(format!("Duplicate scene_id: {scene_id}"));
            }
        }

        for group in &self.groups {
            if let Some(chain_group) = &group.chain_from_group {
                if self.get_group(chain_group).is_none() {
                    errors.push(format!(
                        "Group '{}' references unknown group '{chain_group}'",
                        group.group_id
                    ));
                }
            }
            if let Some(chain_scene) = &group.chain_from_scene {
                if !all_scenes.contains(chain_scene) {
                    errors.push(format!(
                        "Group '{}' references unknown scene '{chain_scene}'",
                        group.group_id
                    ));
                }
            }
        }

        let mut visited = HashSet::new();
        for group in &self.groups {
            if !visited.contains(&group.group_id) {
                let mut path = HashSet::new();
                if self.has_cycle(&group.group_id, &mut visited, &mut path) {
                    errors.push(format!("Circular dependency detected involving group '{}'", group.group_id));
                }
            }
        }

        errors
    }

    fn has_cycle(&self, group_id: &str, visited: &mut HashSet<String>, path: &mut HashSet<String>) -> bool {
        visited.insert(group_id.to_string());
        path.insert(group_id.to_string());

        if let Some(group) = self.get_group(group_id) {
            if let Some(dep) = &group.chain_from_group {
                if path.contains(dep) {
                    return true;
                }
                if !visited.contains(dep) && self.has_cycle(dep, visited, path) {
                    return true;
                }
            }
        }

        path.remove(group_id);
        false
    }

    /// Returns the ordered list of execution waves: each wave is a set of
    /// scene ids safe to run concurrently, respecting group dependencies.
    /// Adjacent parallel-group waves are merged into one.
    pub fn get_execution_waves(&self) -> Vec<Vec<String>> {
        let mut waves: Vec<Vec<String>> = Vec::new();
        let mut completed_groups: HashSet<String> = HashSet::new();

        let mut group_deps: HashMap<String, HashSet<String>> = HashMap::new();
        for group in &self.groups {
            let mut deps = HashSet::new();
            if let Some(chain_group) = &group.chain_from_group {
                deps.insert(chain_group.clone());
            }
            if let Some(chain_scene) = &group.chain_from_scene {
                if let Some(g) = self.get_scene_group(chain_scene) {
                    deps.insert(g.group_id.clone());
                }
            }
            group_deps.insert(group.group_id.clone(), deps);
        }

        let mut remaining: Vec<&SceneGroup> = self.groups.iter().collect();
        // `last_wave_was_parallel_group` tracks whether the most recently
        // appended wave is a whole parallel group's scenes, so consecutive
        // ready parallel groups can be merged into one wave.
        let mut last_wave_is_mergeable_parallel = false;

        while !remaining.is_empty() {
            let ready: Vec<&SceneGroup> = remaining
                .iter()
                .filter(|g| group_deps[&g.group_id].is_subset(&completed_groups))
                .copied()
                .collect();

            if ready.is_empty() {
                // Cycle or dangling dependency; stop rather than loop forever.
                break;
            }

            for group in &ready {
                match group.mode {
                    ExecutionMode::Parallel => {
                        if last_wave_is_mergeable_parallel {
                            waves.last_mut().unwrap().extend(group.scene_ids.clone());
                        } else {
                            waves.push(group.scene_ids.clone());
                        }
                        last_wave_is_mergeable_parallel = true;
                    }
                    ExecutionMode::Sequential => {
                        for scene_id in &group.scene_ids {
                            waves.push(vec![scene_id.clone()]);
                        }
                        last_wave_is_mergeable_parallel = false;
                    }
                }
                completed_groups.insert(group.group_id.clone());
            }

            remaining.retain(|g| !completed_groups.contains(&g.group_id));
        }

        waves
    }
}

fn all_parallel(scenes: &[SceneRef]) -> ExecutionGraph {
    ExecutionGraph {
        groups: vec![SceneGroup {
            group_id: "all_parallel".to_string(),
            scene_ids: scenes.iter().map(|s| s.scene_id.clone()).collect(),
            mode: ExecutionMode::Parallel,
            chain_from_group: None,
            chain_from_scene: None,
            description: "All scenes parallel (no continuity)".to_string(),
        }],
    }
}

fn all_sequential(scenes: &[SceneRef]) -> ExecutionGraph {
    ExecutionGraph {
        groups: vec![SceneGroup {
            group_id: "all_sequential".to_string(),
            scene_ids: scenes.iter().map(|s| s.scene_id.clone()).collect(),
            mode: ExecutionMode::Sequential,
            chain_from_group: None,
            chain_from_scene: None,
            description: "All scenes sequential (maximum continuity)".to_string(),
        }],
    }
}

fn from_continuity_groups(scenes: &[SceneRef]) -> ExecutionGraph {
    let mut group_order: Vec<String> = Vec::new();
    let mut groups_map: HashMap<String, Vec<String>> = HashMap::new();

    for scene in scenes {
        let group_id = scene.continuity_group.clone().unwrap_or_else(|| "default_parallel".to_string());
        if !group_order.contains(&group_id) {
            group_order.push(group_id.clone());
        }
        groups_map.entry(group_id).or_default().push(scene.scene_id.clone());
    }

    let mut groups = Vec::new();
    let mut prev_sequential_group: Option<String> = None;

    for group_id in group_order {
        let scene_ids = groups_map.remove(&group_id).unwrap_or_default();

        if group_id == "default_parallel" {
            groups.push(SceneGroup {
                group_id,
                scene_ids,
                mode: ExecutionMode::Parallel,
                chain_from_group: None,
                chain_from_scene: None,
                description: "Independent scenes (no continuity group specified)".to_string(),
            });
        } else {
            groups.push(SceneGroup {
                group_id: group_id.clone(),
                scene_ids,
                mode: ExecutionMode::Sequential,
                chain_from_group: prev_sequential_group.clone(),
                chain_from_scene: None,
                description: format!("Continuity group: {group_id}"),
            });
            prev_sequential_group = Some(group_id);
        }
    }

    ExecutionGraph { groups }
}

fn auto_detect(scenes: &[SceneRef]) -> ExecutionGraph {
    let analyses: Vec<studio_tools::SceneAnalysis> = scenes
        .iter()
        .map(|s| {
            let text = format!("{} {} {}", s.title, s.description, s.visual_elements.join(" "));
            studio_tools::analyze_scene(&text, s.continuity_group.is_some())
        })
        .collect();

    let mut groups: Vec<SceneGroup> = Vec::new();
    let mut current_sequential: Option<Vec<String>> = None;
    let mut current_group_idx = 0usize;
    let mut parallel_scenes: Vec<String> = Vec::new();

    let finish_sequential = |groups: &mut Vec<SceneGroup>, current: Vec<String>, idx: usize| {
        groups.push(SceneGroup {
            group_id: format!("continuity_{idx}"),
            scene_ids: current,
            mode: ExecutionMode::Sequential,
            chain_from_group: None,
            chain_from_scene: None,
            description: "Auto-detected continuity group".to_string(),
        });
    };

    for (i, scene) in scenes.iter().enumerate() {
        let analysis = &analyses[i];
        let text_lower = format!("{} {} {}", scene.title, scene.description, scene.visual_elements.join(" ")).to_lowercase();

        if analysis.is_parallel {
            if let Some(seq) = current_sequential.take() {
                finish_sequential(&mut groups, seq, current_group_idx);
                current_group_idx += 1;
            }
            parallel_scenes.push(scene.scene_id.clone());
        } else if analysis.needs_continuity {
            if let Some(seq) = current_sequential.as_mut() {
                let prev_analysis = &analyses[i - 1];
                if studio_tools::scenes_related(prev_analysis, analysis, &text_lower) {
                    seq.push(scene.scene_id.clone());
                } else {
                    let finished = std::mem::take(seq);
                    finish_sequential(&mut groups, finished, current_group_idx);
                    current_group_idx += 1;
                    *seq = vec![scene.scene_id.clone()];
                }
            } else {
                current_sequential = Some(vec![scene.scene_id.clone()]);
            }
        } else if let Some(seq) = current_sequential.as_mut() {
            seq.push(scene.scene_id.clone());
        } else {
            parallel_scenes.push(scene.scene_id.clone());
        }
    }

    if let Some(seq) = current_sequential {
        finish_sequential(&mut groups, seq, current_group_idx);
    }

    if !parallel_scenes.is_empty() {
        groups.insert(
            0,
            SceneGroup {
                group_id: "parallel_independent".to_string(),
                scene_ids: parallel_scenes,
                mode: ExecutionMode::Parallel,
                chain_from_group: None,
                chain_from_scene: None,
                description: "Independent scenes (b-roll, inserts, etc.)".to_string(),
            },
        );
    }

    if groups.is_empty() {
        return all_sequential(scenes);
    }

    ExecutionGraph { groups }
}

pub fn build_execution_graph(scenes: &[SceneRef], strategy: GraphStrategy) -> ExecutionGraph {
    match strategy {
        GraphStrategy::AllParallel => all_parallel(scenes),
        GraphStrategy::AllSequential => all_sequential(scenes),
        GraphStrategy::Manual => from_continuity_groups(scenes),
        GraphStrategy::Auto => auto_detect(scenes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, desc: &str, group: Option<&str>) -> SceneRef {
        SceneRef {
            scene_id: id.to_string(),
            title: String::new(),
            description: desc.to_string(),
            visual_elements: vec![],
            continuity_group: group.map(|s| s.to_string()),
        }
    }

    #[test]
    fn all_parallel_strategy_is_one_group_and_one_wave() {
        let scenes = vec![scene("s1", "a", None), scene("s2", "b", None)];
        let graph = build_execution_graph(&scenes, GraphStrategy::AllParallel);
        assert!(graph.validate().is_empty());
        assert_eq!(graph.get_execution_waves(), vec![vec!["s1".to_string(), "s2".to_string()]]);
    }

    #[test]
    fn manual_strategy_chains_sequential_groups_in_order() {
        let scenes = vec![
            scene("s1", "a", None),
            scene("s2", "b", None),
            scene("s3", "continues the hero", Some("hero_arc")),
            scene("s4", "continues the hero", Some("hero_arc")),
            scene("s5", "continues the hero", Some("hero_arc")),
        ];
        let graph = build_execution_graph(&scenes, GraphStrategy::Manual);
        assert!(graph.validate().is_empty());

        let waves = graph.get_execution_waves();
        assert_eq!(waves[0], vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(waves[1], vec!["s3".to_string()]);
        assert_eq!(waves[2], vec!["s4".to_string()]);
        assert_eq!(waves[3], vec!["s5".to_string()]);
    }

    #[test]
    fn every_scene_appears_in_exactly_one_group() {
        let scenes = vec![
            scene("s1", "b-roll establishing shot", None),
            scene("s2", "the protagonist continues talking", None),
            scene("s3", "the protagonist reacts, same room", None),
            scene("s4", "product shot of the device", None),
        ];
        let graph = build_execution_graph(&scenes, GraphStrategy::Auto);
        assert!(graph.validate().is_empty());

        let mut seen = HashSet::new();
        for group in &graph.groups {
            for id in &group.scene_ids {
                assert!(seen.insert(id.clone()), "scene {id} appeared in more than one group");
            }
        }
        assert_eq!(seen.len(), scenes.len());
    }

    #[test]
    fn validate_detects_duplicate_scene_ids() {
        let graph = ExecutionGraph {
            groups: vec![
                SceneGroup {
                    group_id: "a".to_string(),
                    scene_ids: vec!["s1".to_string()],
                    mode: ExecutionMode::Parallel,
                    chain_from_group: None,
                    chain_from_scene: None,
                    description: String::new(),
                },
                SceneGroup {
                    group_id: "b".to_string(),
                    scene_ids: vec!["s1".to_string()],
                    mode: ExecutionMode::Parallel,
                    chain_from_group: None,
                    chain_from_scene: None,
                    description: String::new(),
                },
            ],
        };
        let errors = graph.validate();
        assert!(errors.iter().any(|e| e.contains("Duplicate scene_id")));
    }

    #[test]
    fn validate_detects_cycles() {
        let graph = ExecutionGraph {
            groups: vec![
                SceneGroup {
                    group_id: "a".to_string(),
                    scene_ids: vec!["s1".to_string()],
                    mode: ExecutionMode::Sequential,
                    chain_from_group: Some("b".to_string()),
                    chain_from_scene: None,
                    description: String::new(),
                },
                SceneGroup {
                    group_id: "b".to_string(),
                    scene_ids: vec!["s2".to_string()],
                    mode: ExecutionMode::Sequential,
                    chain_from_group: Some("a".to_string()),
                    chain_from_scene: None,
                    description: String::new(),
                },
            ],
        };
        let errors = graph.validate();
        assert!(errors.iter().any(|e| e.contains("Circular dependency")));
    }

    #[test]
    fn validate_detects_dangling_group_reference() {
        let graph = ExecutionGraph {
            groups: vec![SceneGroup {
                group_id: "a".to_string(),
                scene_ids: vec!["s1".to_string()],
                mode: ExecutionMode::Sequential,
                chain_from_group: Some("missing".to_string()),
                chain_from_scene: None,
                description: String::new(),
            }],
        };
        let errors = graph.validate();
        assert!(errors.iter().any(|e| e.contains("unknown group")));
    }
}
