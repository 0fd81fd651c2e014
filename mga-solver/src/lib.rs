#![warn(missing_docs)]
//! Implementations of the [`Oracle`](mga_core::ports::Oracle) port.
//!
//! Every oracle here solves the same linear program over the probability
//! simplex on the sample points; they differ only in the underlying solver.

/**
 * These are implementations of the LP oracle.
 */
mod impls;
pub use impls::*;

/**
 * Solver-independent configuration.
 */
mod config;
pub use config::SolverConfig;
