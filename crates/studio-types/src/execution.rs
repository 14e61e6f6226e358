use serde::{Deserialize, Serialize};

/// Scheduling relationship between the scenes in a group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Independent scenes, run simultaneously.
    Parallel,
    /// Chained scenes, each depends on the previous one's output.
    Sequential,
}
