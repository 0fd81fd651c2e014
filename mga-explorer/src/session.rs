use crate::{
    CacheError, ExploreError, ExplorerConfig, PathCache, StepRecord, advance, interpolate,
};
use mga_core::{
    models::{
        Constraints, Dimension, Direction, FeasibleRegion, Point, RequestError, Solution, StepRule,
    },
    ports::{Oracle, Solve},
};
use std::sync::Arc;
use tracing::{Level, event};

mod state;
pub use state::{Phase, Selection, StepState};

/// An interactive walk through the feasible region.
///
/// The walk visits the dimensions in priority order. At each step the caller
/// picks a direction with [`choose_direction`](Self::choose_direction), which
/// reports how far that direction can go, optionally previews intermediate
/// values with [`preview_value`](Self::preview_value), and then fixes the
/// step with [`commit`](Self::commit). Every commit adds a permanent bound, so
/// the region only ever narrows.
///
/// Every method either succeeds or leaves the session exactly as it was; a
/// refusal is also recorded in [`message`](Self::message).
pub struct Session<O> {
    region: Arc<FeasibleRegion>,
    oracle: O,
    rule: StepRule,
    tolerance: f64,
    order: Vec<Dimension>,
    constraints: Constraints,
    state: StepState,
    cache: Option<Arc<PathCache>>,
}

impl<O: Oracle> Session<O> {
    /// Start a walk at the sample centroid, with the region's own dimension
    /// order as the priority order
    pub fn new(region: Arc<FeasibleRegion>, oracle: O, config: &ExplorerConfig) -> Self {
        let state = StepState::new(region.centroid());
        Self {
            order: region.dimensions().to_vec(),
            region,
            oracle,
            rule: config.rule(),
            tolerance: config.tolerance,
            constraints: Constraints::new(),
            state,
            cache: None,
        }
    }

    /// Answer value-less steps from a precomputed cache where possible
    pub fn with_cache(mut self, cache: Arc<PathCache>) -> Result<Self, CacheError> {
        cache.check(&self.region, self.rule.epsilon())?;
        self.cache = Some(cache);
        Ok(self)
    }

    /// The region being explored
    pub fn region(&self) -> &FeasibleRegion {
        &self.region
    }

    /// The full step state
    pub fn state(&self) -> &StepState {
        &self.state
    }

    /// The current phase of the walk
    pub fn phase(&self) -> Phase {
        if self.state.step >= self.order.len() {
            Phase::AllCommitted
        } else if self.state.direction.is_some() && self.state.extreme.is_some() {
            Phase::AwaitingValue(self.state.step)
        } else {
            Phase::AwaitingDirection(self.state.step)
        }
    }

    /// The priority order
    pub fn priority_order(&self) -> &[Dimension] {
        &self.order
    }

    /// The dimension explored at the current step, if any remain
    pub fn current_dimension(&self) -> Option<&Dimension> {
        self.order.get(self.state.step)
    }

    /// The bounds committed so far
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The last committed feasible point
    pub fn anchor(&self) -> &Solution {
        &self.state.anchor
    }

    /// The committed steps, in order
    pub fn selections(&self) -> &[Selection] {
        &self.state.selections
    }

    /// A human-readable account of the last action
    pub fn message(&self) -> &str {
        &self.state.message
    }

    /// Change the priority order.
    ///
    /// Only possible before the first commit. Any direction already chosen
    /// for the top dimension is discarded.
    pub fn reorder(&mut self, order: Vec<Dimension>) -> Result<(), RequestError> {
        if self.state.locked {
            return self.refuse_request(RequestError::PriorityLocked);
        }
        if order.len() != self.region.dimensions().len() {
            return self.refuse_request(RequestError::NotAPermutation);
        }
        let mut seen = vec![false; order.len()];
        for dimension in order.iter() {
            let index = match self.region.resolve(dimension) {
                Ok(index) => index,
                Err(error) => return self.refuse_request(error),
            };
            if std::mem::replace(&mut seen[index], true) {
                return self.refuse_request(RequestError::NotAPermutation);
            }
        }

        event!(Level::DEBUG, ?order, "priority order changed");
        self.order = order;
        self.state.clear_choice();
        self.state.message = String::new();
        Ok(())
    }

    /// Choose a direction for the dimension at the current step and find how
    /// far it can go.
    ///
    /// The top dimension goes straight to its global extreme under the
    /// current constraints (Hold stays at the anchor). Later dimensions move
    /// by at most the step fraction of their range, so their extreme is the
    /// anchor a value-less commit would produce.
    pub fn choose_direction(
        &mut self,
        dimension: &Dimension,
        direction: Direction,
    ) -> Result<&Solution, ExploreError> {
        let step = self.state.step;
        let Some(expected) = self.order.get(step).cloned() else {
            return self.refuse(RequestError::Finished.into());
        };
        if let Err(error) = self.region.resolve(dimension) {
            return self.refuse(error.into());
        }
        if *dimension != expected {
            return self.refuse(
                RequestError::WrongDimension {
                    expected,
                    found: dimension.clone(),
                }
                .into(),
            );
        }

        // A cached first step already sits on the global extreme face.
        let extreme = match (step, direction) {
            (0, Direction::Hold) => Ok(self.state.anchor.clone()),
            (0, _) => match self.cached(step, direction) {
                Some(solution) => Ok(solution),
                None => self.global_extreme(dimension, direction),
            },
            _ => self
                .canonical(step, dimension, direction, None)
                .map(|(_, solution)| solution),
        };
        let extreme = match extreme {
            Ok(extreme) => extreme,
            Err(error) => return self.refuse(error),
        };

        let reach = extreme.point.get(dimension).copied().unwrap_or(f64::NAN);
        event!(Level::DEBUG, step, %dimension, %direction, reach, "direction chosen");
        self.state.message = format!("{dimension}: {direction} can reach {reach:.4}");
        self.state.direction = Some(direction);
        self.state.selected = None;
        Ok(self.state.extreme.insert(extreme))
    }

    /// The values a commit at the current step will accept, as `(low, high)`
    pub fn value_range(&self) -> Result<(f64, f64), RequestError> {
        let (step, _, extreme) = self.pending()?;
        let dimension = &self.order[step];
        let a = self.value_of(&self.state.anchor, dimension);
        let e = self.value_of(extreme, dimension);
        Ok((a.min(e), a.max(e)))
    }

    /// Preview the point a value would lead to, without committing it.
    ///
    /// The preview moves every dimension proportionally between the anchor
    /// and the extreme. The value is remembered as the current selection.
    pub fn preview_value(&mut self, value: f64) -> Result<Point, RequestError> {
        let value = match self.check_value(value) {
            Ok(value) => value,
            Err(error) => return self.refuse_request(error),
        };
        let (step, _, extreme) = self.pending()?;
        let dimension = &self.order[step];
        let f = interpolate::fraction(
            value,
            self.value_of(&self.state.anchor, dimension),
            self.value_of(extreme, dimension),
        );
        let preview = interpolate::interpolate(&self.state.anchor.point, &extreme.point, f);
        self.state.selected = Some(value);
        Ok(preview)
    }

    /// Fix the current step.
    ///
    /// Without a value, the bound is derived from the anchor; with one, the
    /// value stands in for the anchor. The bound becomes permanent and the
    /// anchor moves to the nearest point satisfying it. On failure nothing
    /// changes.
    pub fn commit(&mut self, value: Option<f64>) -> Result<&Solution, ExploreError> {
        let (step, direction) = match self.pending() {
            Ok((step, direction, _)) => (step, direction),
            Err(error) => return self.refuse(error.into()),
        };
        let value = match value.map(|v| self.check_value(v)).transpose() {
            Ok(value) => value,
            Err(error) => return self.refuse(error.into()),
        };
        let dimension = self.order[step].clone();

        let (constraints, anchor) = match self.canonical(step, &dimension, direction, value) {
            Ok(result) => result,
            Err(error) => return self.refuse(error),
        };

        let reached = self.value_of(&anchor, &dimension);
        event!(
            Level::INFO,
            phase = "committed",
            step,
            %dimension,
            %direction,
            ?value,
            reached
        );

        self.constraints = constraints;
        self.state.anchor = anchor;
        self.state.selections.push(Selection {
            dimension: dimension.clone(),
            direction,
            value,
            reached,
        });
        self.state.step += 1;
        self.state.locked = true;
        self.state.clear_choice();
        self.state.message = if self.state.step == self.order.len() {
            format!("{dimension} fixed at {reached:.4}; every dimension is committed")
        } else {
            format!(
                "{dimension} fixed at {reached:.4}; next up is {}",
                self.order[self.state.step]
            )
        };
        Ok(&self.state.anchor)
    }

    /// Start over from the centroid with no constraints.
    ///
    /// The priority order is kept but unlocked.
    pub fn reset(&mut self) {
        event!(Level::DEBUG, step = self.state.step, "session reset");
        self.constraints.reset();
        self.state = StepState::new(self.region.centroid());
    }

    // The current step, its direction and extreme, if a direction has been chosen.
    fn pending(&self) -> Result<(usize, Direction, &Solution), RequestError> {
        if self.state.step >= self.order.len() {
            return Err(RequestError::Finished);
        }
        match (self.state.direction, self.state.extreme.as_ref()) {
            (Some(direction), Some(extreme)) => Ok((self.state.step, direction, extreme)),
            _ => Err(RequestError::NoDirection),
        }
    }

    fn value_of(&self, solution: &Solution, dimension: &Dimension) -> f64 {
        solution.point.get(dimension).copied().unwrap_or(f64::NAN)
    }

    // A value must lie within the current range, up to the relative tolerance.
    fn check_value(&self, value: f64) -> Result<f64, RequestError> {
        if !value.is_finite() {
            return Err(RequestError::NotFinite(value));
        }
        let (lower, upper) = self.value_range()?;
        let dimension = &self.order[self.state.step];
        let range = self
            .region
            .extent_of(dimension.as_str())
            .map(|extent| extent.range())
            .unwrap_or_default();
        let slack = self.tolerance * range.max(1.0);
        if value < lower - slack || value > upper + slack {
            return Err(RequestError::OutOfRange {
                value,
                lower,
                upper,
            });
        }
        Ok(value)
    }

    fn global_extreme(
        &self,
        dimension: &Dimension,
        direction: Direction,
    ) -> Result<Solution, ExploreError> {
        let outcome = self
            .oracle
            .optimize(
                &self.region,
                self.constraints.as_set(),
                dimension,
                direction.extreme_sense(),
            )
            .map_err(ExploreError::oracle)?;
        match outcome {
            Solve::Optimal(solution) => Ok(solution),
            Solve::Infeasible => Err(ExploreError::Infeasible),
            Solve::TimedOut => Err(ExploreError::SolverTimeout),
        }
    }

    // The step's bound and the anchor it leads to, from the cache when every
    // step so far (this one included) is value-less.
    fn canonical(
        &self,
        step: usize,
        dimension: &Dimension,
        direction: Direction,
        value: Option<f64>,
    ) -> Result<(Constraints, Solution), ExploreError> {
        if value.is_none()
            && let Some(solution) = self.cached(step, direction)
        {
            let index = self.region.resolve(dimension)?;
            let current = self.value_of(&self.state.anchor, dimension);
            let mut constraints = self.constraints.clone();
            self.rule
                .plan(self.region.extent(index), current, direction, step, None)
                .apply(dimension, &mut constraints);
            event!(Level::DEBUG, step, %dimension, %direction, "answered from cache");
            return Ok((constraints, solution));
        }

        advance(
            &self.oracle,
            &self.region,
            &self.rule,
            &self.constraints,
            &self.state.anchor,
            dimension,
            direction,
            step,
            value,
        )
    }

    // The cached anchor for taking `direction` at `step`, if every earlier
    // commit was value-less and the prefix has been precomputed.
    fn cached(&self, step: usize, direction: Direction) -> Option<Solution> {
        let cache = self.cache.as_ref()?;
        if self.state.selections.iter().any(|s| s.value.is_some()) {
            return None;
        }
        let mut directions = self
            .state
            .selections
            .iter()
            .map(|s| s.direction)
            .collect::<Vec<_>>();
        directions.push(direction);
        cache
            .lookup(&self.order[..=step], &directions)
            .map(StepRecord::solution)
    }

    fn refuse<T>(&mut self, error: ExploreError) -> Result<T, ExploreError> {
        match &error {
            ExploreError::SolverTimeout => {
                event!(Level::WARN, step = self.state.step, "solver timed out")
            }
            ExploreError::Oracle(inner) => {
                event!(Level::ERROR, step = self.state.step, error = %inner, "oracle failed")
            }
            _ => event!(Level::INFO, step = self.state.step, %error, "step refused"),
        }
        self.state.message = error.to_string();
        Err(error)
    }

    fn refuse_request<T>(&mut self, error: RequestError) -> Result<T, RequestError> {
        event!(Level::INFO, step = self.state.step, %error, "request refused");
        self.state.message = error.to_string();
        Err(error)
    }
}
