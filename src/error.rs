//! Error taxonomy of the scheduling engine.
//!
//! Every failure surfaces to the caller as a [`RosterError`]; nothing is
//! retried internally. Input problems short-circuit before any decision
//! variable is created.

use thiserror::Error;

use crate::audit::Violation;

#[derive(Debug, Error)]
pub enum RosterError {
    /// Malformed or inconsistent request data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The required person-shifts provably exceed what the roster can supply.
    #[error("insufficient capacity: {0}")]
    InsufficientCapacity(String),

    /// The solver proved that no assignment satisfies the full rule set.
    #[error("no schedule satisfies the roster rules for this month")]
    Infeasible,

    /// The wall clock ran out before any feasible assignment was found.
    #[error("solver exhausted the time limit without finding a schedule")]
    Timeout,

    /// Unexpected failure of the solver backend.
    #[error("solver failure: {0}")]
    Solver(String),

    /// The emitted schedule failed the post-solve audit. This is a model
    /// bug, never a normal outcome.
    #[error("schedule failed the post-solve audit with {} violation(s)", .0.len())]
    InternalValidation(Vec<Violation>),
}

impl RosterError {
    /// Stable wire identifier of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RosterError::InvalidInput(_) => "INVALID_INPUT",
            RosterError::InsufficientCapacity(_) => "INSUFFICIENT_CAPACITY",
            RosterError::Infeasible => "INFEASIBLE",
            RosterError::Timeout => "TIMEOUT",
            RosterError::Solver(_) => "INTERNAL",
            RosterError::InternalValidation(_) => "INTERNAL_VALIDATION_FAILED",
        }
    }
}
