use mga_core::models::RequestError;
use thiserror::Error;

/// The ways an exploration step can be refused.
///
/// None of these are fatal: a refused step leaves the session exactly as it
/// was, and the caller may try a different direction or value.
#[derive(Debug, Error)]
pub enum ExploreError {
    /// The request itself was malformed
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    /// No convex combination of the samples satisfies the constraints
    #[error("no feasible point satisfies the constraints")]
    Infeasible,

    /// The solver gave up before reaching a verdict
    #[error("the solver ran out of time")]
    SolverTimeout,

    /// The oracle itself failed
    #[error("oracle failure: {0}")]
    Oracle(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ExploreError {
    pub(crate) fn oracle<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Self::Oracle(Box::new(error))
    }

    /// True for the outcomes a user can recover from by choosing differently
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Infeasible | Self::SolverTimeout)
    }
}
