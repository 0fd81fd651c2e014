use mga_core::models::{Dimension, Direction, Solution};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in its walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "step", rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a direction for the dimension at this priority index
    AwaitingDirection(usize),
    /// A direction has been chosen and its extreme is known
    AwaitingValue(usize),
    /// Every dimension has been committed
    AllCommitted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingDirection(k) => write!(f, "awaiting direction for step {k}"),
            Self::AwaitingValue(k) => write!(f, "awaiting value for step {k}"),
            Self::AllCommitted => f.write_str("all committed"),
        }
    }
}

/// One committed step, as shown in the "your selections" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// The dimension explored at this step
    pub dimension: Dimension,
    /// The direction taken
    pub direction: Direction,
    /// The value the user committed, if any
    pub value: Option<f64>,
    /// The dimension's value at the anchor the commit produced
    pub reached: f64,
}

/// Everything a session tracks about the walk in progress.
///
/// The priority order and the constraint accumulator live alongside this in
/// the [`Session`](super::Session); this is the part a front-end renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepState {
    /// Zero-based index of the dimension being explored; equals the number of
    /// dimensions once every step is committed
    pub step: usize,
    /// The last committed feasible point, initially the sample centroid
    pub anchor: Solution,
    /// The direction chosen for the current step
    pub direction: Option<Direction>,
    /// How far the chosen direction can go
    pub extreme: Option<Solution>,
    /// The last value previewed at this step
    pub selected: Option<f64>,
    /// The committed steps, in order
    pub selections: Vec<Selection>,
    /// A human-readable account of the last action
    pub message: String,
    /// Whether the priority order is frozen
    pub locked: bool,
}

impl StepState {
    pub(crate) fn new(anchor: Solution) -> Self {
        Self {
            step: 0,
            anchor,
            direction: None,
            extreme: None,
            selected: None,
            selections: Vec::new(),
            message: String::new(),
            locked: false,
        }
    }

    pub(crate) fn clear_choice(&mut self) {
        self.direction = None;
        self.extreme = None;
        self.selected = None;
    }
}
