#![warn(missing_docs)]
//! Core types for "Modeling to Generate Alternatives" style exploration.
//!
//! A feasible region is represented by a finite set of sample points; every
//! point the system ever reports is a convex combination of those samples.
//! The crate holds the data structures describing that region and the
//! constraints accumulated while walking through it, as well as the single
//! port through which an LP solver is plugged in.

/// Domain models for the exploration engine.
///
/// These are plain data structures with minimal logic: the sampled region,
/// points and weights, directions, per-dimension bounds, the constraint
/// accumulator and the rule that turns a user's direction into a bound.
pub mod models;

/// Interface traits for the exploration engine.
///
/// The engine never talks to an LP solver directly; it goes through the
/// [`Oracle`](ports::Oracle) trait defined here, so that any simplex or
/// interior point implementation can be substituted.
pub mod ports;
