use super::{Bound, Dimension, Map};

/// An immutable view of the per-dimension bounds imposed so far
pub type ConstraintSet = Map<Dimension, Bound>;

/// The constraint accumulator.
///
/// Bounds are added or overwritten per dimension as steps commit and are
/// only ever cleared wholesale. No semantic validation happens here: a bound
/// with `lower > upper` is stored as given and shows up as an infeasible
/// solve downstream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constraints(ConstraintSet);

impl Constraints {
    /// An empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) the bound on `dimension`
    pub fn set(&mut self, dimension: Dimension, bound: Bound) {
        self.0.insert(dimension, bound);
    }

    /// The bound on `dimension`, unconstrained if none has been set
    pub fn get(&self, dimension: &str) -> Bound {
        self.0.get(dimension).copied().unwrap_or_default()
    }

    /// A copy of the current constraints, suitable for handing to an oracle
    pub fn snapshot(&self) -> ConstraintSet {
        self.0.clone()
    }

    /// Borrow the current constraints without copying
    pub fn as_set(&self) -> &ConstraintSet {
        &self.0
    }

    /// Drop every bound
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// The number of constrained dimensions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is constrained
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ConstraintSet> for Constraints {
    fn from(value: ConstraintSet) -> Self {
        Self(value)
    }
}
