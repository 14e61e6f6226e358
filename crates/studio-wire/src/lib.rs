pub mod edl;
pub mod export;

pub use edl::{EditCandidate, EditDecision, EditDecisionList, ExportFormat, HumanFeedback};
pub use export::export;
