//! Core production-planning types for the studio engine: budget, script,
//! content library, DoP, and execution graph.

pub mod budget;
pub mod content_library;
pub mod dop;
pub mod error;
pub mod execution;
pub mod script;

pub use budget::{cost_model, BudgetLedger, CostEstimate, CostModel};
pub use content_library::{AssetQuery, AssetRecord, ContentLibrary, LibrarySummary};
pub use dop::{assign_visuals, mode_counts, BudgetTierConfig, DopBudgetTier};
pub use error::{StudioError, StudioResult};
pub use execution::{build_execution_graph, ExecutionGraph, GraphStrategy, SceneGroup, SceneRef};
pub use script::{classify_intent, calculate_importance, FigureInventory, ScriptSegment, StructuredScript};
