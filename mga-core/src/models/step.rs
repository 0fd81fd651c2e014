use super::{Bound, ConstraintSet, Constraints, Dimension, Direction, Extent, Sense};

/// The fraction of a dimension's global range a non-top dimension may move in one step
pub const DEFAULT_EPSILON: f64 = 0.02;

// Half-width of the query-only pin used for Hold, relative to the range.
// An exact equality would sit on the boundary of the feasible set whenever
// the anchor came out of a degenerate solve.
const PIN_SLACK: f64 = 1e-7;

/// What committing (or previewing) one step does.
///
/// `bound` is written into the accumulator; `pin` only narrows the canonical
/// query and is never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepPlan {
    /// The bound to store for the step's dimension, if any
    pub bound: Option<Bound>,
    /// The sense in which the step's dimension is optimized
    pub sense: Sense,
    /// A narrow band around the held value, used for the query only
    pub pin: Option<Bound>,
}

impl StepPlan {
    /// Store the plan's bound into the accumulator
    pub fn apply(&self, dimension: &Dimension, constraints: &mut Constraints) {
        if let Some(bound) = self.bound {
            constraints.set(dimension.clone(), bound);
        }
    }

    /// The constraint set to hand to the oracle for the canonical query,
    /// given the accumulator *after* [`apply`](Self::apply).
    pub fn query(&self, dimension: &Dimension, constraints: &Constraints) -> ConstraintSet {
        let mut set = constraints.snapshot();
        if let Some(pin) = self.pin {
            set.insert(dimension.clone(), pin);
        }
        set
    }
}

/// The constraint-generation rule shared by the live session and the
/// offline enumerator.
///
/// Step 0 jumps straight to the global extreme of the top dimension; later
/// steps move their dimension by at most `epsilon` of its global range.
/// The canonical anchor after a step always optimizes the step's own
/// dimension: the nearest point meeting the new bound for Increase and
/// Decrease, and the held value itself for Hold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRule {
    epsilon: f64,
}

impl Default for StepRule {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl StepRule {
    /// Create a rule with the given step fraction
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// The step fraction
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Plan a step.
    ///
    /// * `extent` - the global extent of the step's dimension
    /// * `anchor` - the anchor's value in that dimension
    /// * `step` - the zero-based priority index
    /// * `value` - an explicitly selected value, substituted for the anchor
    pub fn plan(
        &self,
        extent: Extent,
        anchor: f64,
        direction: Direction,
        step: usize,
        value: Option<f64>,
    ) -> StepPlan {
        let x = value.unwrap_or(anchor);

        let bound = if step == 0 {
            match direction {
                Direction::Increase => Some(Bound::at_least(value.unwrap_or(extent.upper))),
                Direction::Decrease => Some(Bound::at_most(value.unwrap_or(extent.lower))),
                Direction::Hold => None,
            }
        } else {
            let delta = self.epsilon * extent.range();
            let up = (x + delta).min(extent.upper);
            let down = (x - delta).max(extent.lower);
            match direction {
                Direction::Increase => Some(Bound::at_least(up)),
                Direction::Decrease => Some(Bound::at_most(down)),
                Direction::Hold => Some(Bound::between(down, up)),
            }
        };

        let (sense, pin) = match direction {
            Direction::Increase => (Sense::Minimize, None),
            Direction::Decrease => (Sense::Maximize, None),
            Direction::Hold => {
                let slack = PIN_SLACK * extent.range().max(1.0);
                (Sense::Minimize, Some(Bound::between(x - slack, x + slack)))
            }
        };

        StepPlan { bound, sense, pin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EXTENT: Extent = Extent {
        lower: 0.0,
        upper: 10.0,
    };

    #[test]
    fn first_step_targets_global_extremes() {
        let rule = StepRule::default();

        let up = rule.plan(EXTENT, 5.0, Direction::Increase, 0, None);
        assert_eq!(up.bound, Some(Bound::at_least(10.0)));
        assert_eq!(up.sense, Sense::Minimize);

        let down = rule.plan(EXTENT, 5.0, Direction::Decrease, 0, None);
        assert_eq!(down.bound, Some(Bound::at_most(0.0)));
        assert_eq!(down.sense, Sense::Maximize);

        let hold = rule.plan(EXTENT, 5.0, Direction::Hold, 0, None);
        assert_eq!(hold.bound, None);
        assert!(hold.pin.unwrap().contains(5.0, 0.0));
    }

    #[test]
    fn first_step_uses_selected_value() {
        let plan = StepRule::default().plan(EXTENT, 5.0, Direction::Increase, 0, Some(7.5));
        assert_eq!(plan.bound, Some(Bound::at_least(7.5)));
    }

    #[test]
    fn later_steps_move_by_epsilon() {
        let rule = StepRule::default();

        let up = rule.plan(EXTENT, 5.0, Direction::Increase, 2, None).bound.unwrap();
        assert_abs_diff_eq!(up.lower().unwrap(), 5.2, epsilon = 1e-12);
        assert_eq!(up.upper(), None);

        let down = rule.plan(EXTENT, 5.0, Direction::Decrease, 1, None).bound.unwrap();
        assert_abs_diff_eq!(down.upper().unwrap(), 4.8, epsilon = 1e-12);

        let hold = rule.plan(EXTENT, 5.0, Direction::Hold, 1, None).bound.unwrap();
        assert_abs_diff_eq!(hold.lower().unwrap(), 4.8, epsilon = 1e-12);
        assert_abs_diff_eq!(hold.upper().unwrap(), 5.2, epsilon = 1e-12);
    }

    #[test]
    fn later_steps_clamp_to_global_extent() {
        let rule = StepRule::new(0.1);
        let up = rule.plan(EXTENT, 9.5, Direction::Increase, 1, None).bound.unwrap();
        assert_eq!(up.lower(), Some(10.0));
        let hold = rule.plan(EXTENT, 0.2, Direction::Hold, 1, None).bound.unwrap();
        assert_eq!(hold.lower(), Some(0.0));
    }

    #[test]
    fn selected_value_replaces_anchor() {
        let plan = StepRule::default().plan(EXTENT, 5.0, Direction::Decrease, 3, Some(3.0));
        assert_abs_diff_eq!(plan.bound.unwrap().upper().unwrap(), 2.8, epsilon = 1e-12);
    }

    #[test]
    fn hold_pins_query_but_stores_band() {
        let rule = StepRule::default();
        let plan = rule.plan(EXTENT, 5.0, Direction::Hold, 1, None);

        let mut constraints = Constraints::new();
        let dimension = Dimension::from("Wind");
        plan.apply(&dimension, &mut constraints);
        let query = plan.query(&dimension, &constraints);

        assert_eq!(constraints.get("Wind"), plan.bound.unwrap());
        assert!(query["Wind"].upper().unwrap() - query["Wind"].lower().unwrap() < 1e-5);
    }
}
