use thiserror::Error;

/// The closed set of error kinds the core engine can raise. `BudgetExceeded`,
/// `QAFailure`, and validation failures are deliberately not variants here —
/// they are informational outcomes (a ledger going negative, a `QAResult`
/// that failed, a `Vec<String>` from graph validation), never thrown.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid agent response: {0}")]
    InvalidAgentResponse(String),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("provider failure after retries: {0}")]
    ProviderFailure(String),
}

pub type StudioResult<T> = Result<T, StudioError>;
