use clap::Parser;
use std::{io::Write as _, path::PathBuf};

mod config;
pub use config::AppConfig;

mod io;
pub use io::*;

mod commands;
pub use commands::*;

// The top-level arguments: an optional config file and the subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "MGA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub async fn evaluate(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Bounds { io, format } => {
                let region = io.read_region(format)?;
                io.write_json(&bounds::summarize(&region))?;
            }
            Commands::Walk {
                io,
                format,
                order,
                steps,
                cache,
            } => {
                let region = io.read_region(format)?;
                let cache = cache.as_deref().map(open_cache).transpose()?;
                let report = walk::run(region, cache, order, steps, &config)?;
                io.write_json(&report)?;
            }
            Commands::Precompute {
                io,
                format,
                resume,
                threads,
            } => {
                let region = io.read_region(format)?;
                let resume = resume.as_deref().map(open_cache).transpose()?;
                let threads = threads.or(config.precompute.threads);
                let (cache, cancelled) = precompute::run(region, resume, threads, &config).await?;
                let mut output = io.write()?;
                cache.write(&mut output)?;
                output.flush()?;
                if cancelled {
                    return Err(CliError::Interrupted(cache.completed.len()))?;
                }
            }
            Commands::Lookup {
                io,
                order,
                directions,
            } => {
                let cache = io.read_cache()?;
                io.write_json(&lookup::find(&cache, order, directions)?)?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Unable to infer the sample table format, please specify --format")]
    FormatInference,
    #[error("More steps were given than there are dimensions")]
    TooManySteps,
    #[error("No cached path for {0}")]
    NotCached(String),
    #[error("Interrupted after {0} cases; pass the output to --resume to continue")]
    Interrupted(usize),
}
