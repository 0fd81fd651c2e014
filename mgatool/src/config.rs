//! Application configuration management.
//!
//! Settings come from default values, an optional TOML file and environment
//! variables, in increasing order of precedence.

use mga_explorer::{ExplorerConfig, PrecomputeConfig};
use mga_solver::SolverConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Step fraction and value tolerance
    #[serde(default)]
    pub explorer: ExplorerConfig,

    /// LP solver limits
    #[serde(default)]
    pub solver: SolverConfig,

    /// Path enumeration settings
    #[serde(default)]
    pub precompute: PrecomputeConfig,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given on the command line
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `MGA_<SECTION>__<KEY>` to `<section>.<key>`, e.g.
    ///
    /// ```bash
    /// export MGA_EXPLORER__EPSILON=0.05
    /// export MGA_SOLVER__TIME_LIMIT=2s
    /// export MGA_PRECOMPUTE__THREADS=8
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        // This maps MGA_SOLVER__TIME_LIMIT to solver.time_limit
        config = config.add_source(
            config::Environment::with_prefix("MGA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
