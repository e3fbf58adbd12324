use thiserror::Error;

use crate::{DispatchPlan, DispatchSnapshot, MatrixError};

/// Errors returned by [`Solver::solve`].
///
/// Capacity, time budget, zone and reserved-cap limits are not errors: orders
/// that cannot be placed are reported in
/// [`DispatchPlan::unassigned_orders`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The distance oracle failed, timed out or returned a non-success code.
    ///
    /// No partial plan is produced; retrying is the caller's decision.
    #[error("distance matrix unavailable: {0}")]
    MatrixUnavailable(#[source] MatrixError),
}

impl From<MatrixError> for SolveError {
    fn from(err: MatrixError) -> Self {
        Self::MatrixUnavailable(err)
    }
}

/// Assign a snapshot of orders to a snapshot of workers.
///
/// Solvers hold no state between calls and must be `Send + Sync` so a hosting
/// service can run independent calls in parallel.
pub trait Solver: Send + Sync {
    /// Produce a plan for `snapshot`, or fail as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::MatrixUnavailable`] when travel costs cannot be
    /// fetched.
    fn solve(&self, snapshot: &DispatchSnapshot) -> Result<DispatchPlan, SolveError>;
}
