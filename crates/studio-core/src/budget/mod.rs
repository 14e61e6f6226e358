pub mod cost_model;
pub mod ledger;

pub use cost_model::{
    audio_cost_multiplier, cost_model, estimate_audio_cost, estimate_pilot_test_cost,
    estimate_realistic_cost, estimate_scene_cost, CostEstimate, CostModel,
};
pub use ledger::BudgetLedger;
