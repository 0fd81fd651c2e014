#![warn(missing_docs)]
//! Sequential exploration of a sampled feasible region.
//!
//! A [`Session`] walks the region one dimension at a time, in a priority
//! order chosen by the user: for each dimension it asks the
//! [`Oracle`](mga_core::ports::Oracle) how far the chosen direction can go,
//! lets the caller preview and pick a value, and commits the choice as a
//! permanent constraint. The [`Enumerator`] replays every value-less walk
//! offline and stores the results in a [`PathCache`], which a deployed session
//! can consult instead of solving live.

mod config;
pub use config::{ExplorerConfig, PrecomputeConfig};

mod error;
pub use error::ExploreError;

/// Preview points between the anchor and the extreme
pub mod interpolate;

mod walk;
pub use walk::advance;

mod session;
pub use session::{Phase, Selection, Session, StepState};

mod cache;
pub use cache::{CacheError, PathCache, PathKey, StepRecord};

mod precompute;
pub use precompute::{Case, Enumerator, PrecomputeError, Progress, Replay};

/// Readers for sample tables stored as JSON or CSV
pub mod io;
