use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::{StudioError, StudioResult};

#[derive(Debug, Default)]
struct LedgerState {
    pilot_spending: HashMap<String, f64>,
    overhead_spending: f64,
}

/// Tracks spending across competing pilots against a single hard budget
/// envelope. Every mutation and read goes through an async `RwLock` so the
/// ledger can be shared (`Arc<BudgetLedger>`) across concurrently running
/// pilot tasks without the caller holding the lock across an `.await`.
#[derive(Debug)]
pub struct BudgetLedger {
    total_budget: f64,
    state: RwLock<LedgerState>,
}

impl BudgetLedger {
    pub fn new(total_budget: f64) -> Self {
        Self {
            total_budget,
            state: RwLock::new(LedgerState::default()),
        }
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    /// Records spend against a specific pilot. Returns an error for a
    /// negative amount; going over budget is allowed (and observable via
    /// `get_remaining` going negative) rather than rejected.
    pub async fn record_spend(&self, pilot_id: &str, amount: f64) -> StudioResult<()> {
        if amount < 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "spend amount must be non-negative, got {amount}"
            )));
        }
        let mut state = self.state.write().await;
        *state.pilot_spending.entry(pilot_id.to_string()).or_insert(0.0) += amount;
        Ok(())
    }

    /// Records overhead spend not attributable to a specific pilot (text
    /// completion calls, failed generations outside a pilot's own budget).
    pub async fn record_overhead(&self, amount: f64) -> StudioResult<()> {
        if amount < 0.0 {
            return Err(StudioError::InvalidInput(format!(
                "overhead amount must be non-negative, got {amount}"
            )));
        }
        let mut state = self.state.write().await;
        state.overhead_spending += amount;
        Ok(())
    }

    pub async fn get_pilot_spent(&self, pilot_id: &str) -> f64 {
        self.state
            .read()
            .await
            .pilot_spending
            .get(pilot_id)
            .copied()
            .unwrap_or(0.0)
    }

    pub async fn get_total_spent(&self) -> f64 {
        let state = self.state.read().await;
        state.pilot_spending.values().sum::<f64>() + state.overhead_spending
    }

    pub async fn get_remaining(&self) -> f64 {
        self.total_budget - self.get_total_spent().await
    }

    /// Whether an additional spend of `amount` would keep total spend
    /// within the budget envelope.
    pub async fn can_afford(&self, amount: f64) -> bool {
        self.get_remaining().await >= amount
    }
}
