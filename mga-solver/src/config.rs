//! Configuration shared by the LP oracle implementations.

use std::time::Duration;

/// Solver limits and tolerances.
///
/// # Examples
///
/// ```
/// use mga_solver::SolverConfig;
/// use std::time::Duration;
///
/// // Default configuration
/// let config = SolverConfig::default();
///
/// // A tighter time budget for interactive use
/// let config = SolverConfig {
///     time_limit: Duration::from_secs(2),
///     ..SolverConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Wall-clock budget for a single solve; expiry is reported as a timeout
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_time_limit", with = "humantime_serde")
    )]
    pub time_limit: Duration,

    /// Iteration cap for a single solve
    #[cfg_attr(feature = "serde", serde(default = "default_max_iter"))]
    pub max_iter: u32,

    /// Slack allowed when accepting a solution the solver could not fully certify
    #[cfg_attr(feature = "serde", serde(default = "default_tolerance"))]
    pub tolerance: f64,

    /// Whether the solver prints its own iteration log
    #[cfg_attr(feature = "serde", serde(default))]
    pub verbose: bool,
}

fn default_time_limit() -> Duration {
    Duration::from_secs(10)
}

fn default_max_iter() -> u32 {
    200
}

fn default_tolerance() -> f64 {
    1e-6
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: default_time_limit(),
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
            verbose: false,
        }
    }
}
