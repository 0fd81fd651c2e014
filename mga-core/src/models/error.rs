use super::Dimension;
use thiserror::Error;

/// The ways in which a caller can ask for something the engine will not do.
///
/// These are rejected locally, before any state changes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    /// The dimension is not part of the loaded region
    #[error("unknown dimension: {0}")]
    UnknownDimension(Dimension),
    /// A direction was given for a dimension other than the one being explored
    #[error("step explores {expected}, not {found}")]
    WrongDimension {
        /// The dimension at the current priority index
        expected: Dimension,
        /// The dimension that was supplied
        found: Dimension,
    },
    /// The priority order cannot change once a step has been committed
    #[error("priority order is locked; reset to change it")]
    PriorityLocked,
    /// A proposed priority order does not list every dimension exactly once
    #[error("priority order must be a permutation of the region's dimensions")]
    NotAPermutation,
    /// A value lies outside the currently achievable range
    #[error("value {value} is outside the achievable range [{lower}, {upper}]")]
    OutOfRange {
        /// The offending value
        value: f64,
        /// Smallest admissible value
        lower: f64,
        /// Largest admissible value
        upper: f64,
    },
    /// A value was NaN or infinite
    #[error("value {0} is not finite")]
    NotFinite(f64),
    /// A value was given (or a commit requested) before choosing a direction
    #[error("choose a direction first")]
    NoDirection,
    /// Every dimension has already been committed
    #[error("every dimension has been committed; reset to start over")]
    Finished,
}
