use mga_core::models::{DEFAULT_EPSILON, StepRule};
use serde::{Deserialize, Serialize};

/// Settings for an interactive exploration session.
///
/// # Examples
///
/// ```
/// use mga_explorer::ExplorerConfig;
///
/// // Let lower-priority dimensions move 5% of their range per step
/// let config = ExplorerConfig {
///     epsilon: 0.05,
///     ..ExplorerConfig::default()
/// };
/// assert_eq!(config.rule().epsilon(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// The fraction of a dimension's global range a non-top dimension may move per step
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Relative slack when checking a value against the achievable range
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

fn default_tolerance() -> f64 {
    1e-6
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            tolerance: default_tolerance(),
        }
    }
}

impl ExplorerConfig {
    /// The step rule these settings describe
    pub fn rule(&self) -> StepRule {
        StepRule::new(self.epsilon)
    }
}

/// Settings for the offline path enumerator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputeConfig {
    /// Worker threads; `None` uses one per core
    #[serde(default)]
    pub threads: Option<usize>,

    /// Emit a progress event every this many cases
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
}

fn default_progress_every() -> usize {
    500
}

impl Default for PrecomputeConfig {
    fn default() -> Self {
        Self {
            threads: None,
            progress_every: default_progress_every(),
        }
    }
}
