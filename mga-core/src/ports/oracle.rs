use crate::models::{ConstraintSet, Dimension, FeasibleRegion, Sense, Solution};

/// The result of one LP query
#[derive(Clone, Debug, PartialEq)]
pub enum Solve {
    /// An optimal convex combination was found
    Optimal(Solution),
    /// No convex combination satisfies the constraints (or the problem is unbounded)
    Infeasible,
    /// The solver hit its time limit before reaching a verdict
    TimedOut,
}

impl Solve {
    /// The solution, if the query was successful
    pub fn optimal(self) -> Option<Solution> {
        match self {
            Self::Optimal(solution) => Some(solution),
            Self::Infeasible | Self::TimedOut => None,
        }
    }
}

/// Interface for LP solvers that optimize over the convex hull of the samples.
///
/// An oracle solves, for weights `λ ≥ 0` with `Σλ = 1`,
///
/// ```text
/// optimize  Σ_j λ_j · sample_j[objective]
/// s.t.      lb_d ≤ Σ_j λ_j · sample_j[d] ≤ ub_d   for every (d, (lb, ub)) in constraints
/// ```
///
/// where each side of a bound is only applied if present. The returned
/// [`Solution`] carries the point in *every* dimension, not just the
/// objective, since all dimensions move together with the weights.
///
/// Expected infeasibility is a value ([`Solve::Infeasible`]), never an error.
/// Errors are reserved for malformed requests (e.g. an objective that is not
/// a dimension of the region) and for solver failures.
pub trait Oracle: Send + Sync {
    /// Error type for malformed requests and solver failures
    type Error: std::error::Error + Send + Sync + 'static;

    /// Optimize `objective` in the given sense under `constraints`.
    fn optimize(
        &self,
        region: &FeasibleRegion,
        constraints: &ConstraintSet,
        objective: &Dimension,
        sense: Sense,
    ) -> Result<Solve, Self::Error>;
}

impl<T: Oracle + ?Sized> Oracle for &T {
    type Error = T::Error;

    fn optimize(
        &self,
        region: &FeasibleRegion,
        constraints: &ConstraintSet,
        objective: &Dimension,
        sense: Sense,
    ) -> Result<Solve, Self::Error> {
        (**self).optimize(region, constraints, objective, sense)
    }
}

impl<T: Oracle + ?Sized> Oracle for std::sync::Arc<T> {
    type Error = T::Error;

    fn optimize(
        &self,
        region: &FeasibleRegion,
        constraints: &ConstraintSet,
        objective: &Dimension,
        sense: Sense,
    ) -> Result<Solve, Self::Error> {
        (**self).optimize(region, constraints, objective, sense)
    }
}
