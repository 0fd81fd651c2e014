use crate::ExploreError;
use mga_core::{
    models::{Constraints, Dimension, Direction, FeasibleRegion, RequestError, Solution, StepRule},
    ports::{Oracle, Solve},
};

/// Take one step of a walk.
///
/// Plans the step's bound from `anchor` (or from `value`, when one is
/// selected), stores it into a copy of `constraints` and runs the canonical
/// query for `dimension`. The caller's accumulator is never touched; on
/// success the enlarged copy is returned alongside the new anchor.
///
/// The live [`Session`](crate::Session) and the offline
/// [`Enumerator`](crate::Enumerator) both step through here, which is what
/// lets a precomputed path stand in for live solves.
#[allow(clippy::too_many_arguments)]
pub fn advance<O: Oracle>(
    oracle: &O,
    region: &FeasibleRegion,
    rule: &StepRule,
    constraints: &Constraints,
    anchor: &Solution,
    dimension: &Dimension,
    direction: Direction,
    step: usize,
    value: Option<f64>,
) -> Result<(Constraints, Solution), ExploreError> {
    let index = region.resolve(dimension)?;
    let current = anchor
        .point
        .get(dimension)
        .copied()
        .ok_or_else(|| RequestError::UnknownDimension(dimension.clone()))?;

    let plan = rule.plan(region.extent(index), current, direction, step, value);
    let mut next = constraints.clone();
    plan.apply(dimension, &mut next);
    let query = plan.query(dimension, &next);

    match oracle
        .optimize(region, &query, dimension, plan.sense)
        .map_err(ExploreError::oracle)?
    {
        Solve::Optimal(solution) => Ok((next, solution)),
        Solve::Infeasible => Err(ExploreError::Infeasible),
        Solve::TimedOut => Err(ExploreError::SolverTimeout),
    }
}
