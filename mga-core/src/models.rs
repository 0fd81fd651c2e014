mod bound;
mod constraint;
mod dimension;
mod direction;
mod error;
mod map;
mod region;
mod step;

pub use bound::Bound;
pub use constraint::{ConstraintSet, Constraints};
pub use dimension::Dimension;
pub use direction::{Direction, DirectionParseError, Sense};
pub use error::RequestError;
pub use map::Map;
pub use region::{DataError, Extent, FeasibleRegion, Point, SampleTable, Solution};
pub use step::{DEFAULT_EPSILON, StepPlan, StepRule};
