// Errors raised while fitting a resistor network

use super::solver_service::SolverError;

/// Failure of a fit request
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// Rejected before any model was built
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The engine returned something a correct engine cannot return for this model
    #[error("Solver defect: {0}")]
    SolverDefect(String),

    /// The wall-clock budget ran out before the engine held a usable selection
    #[error("Time limit of {limit_secs}s reached without a usable selection")]
    BudgetExhausted { limit_secs: f64 },

    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type FitResult<T> = std::result::Result<T, FitError>;

impl FitError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn solver_defect(message: impl Into<String>) -> Self {
        Self::SolverDefect(message.into())
    }
}
