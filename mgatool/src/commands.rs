use super::IOArgs;
use clap::Subcommand;
use mga_core::models::Direction;
use mga_explorer::io::TableFormat;
use std::path::PathBuf;

pub mod bounds;
pub mod lookup;
pub mod precompute;
pub mod walk;

#[derive(Subcommand)]
pub enum Commands {
    /// Report the global extent of every dimension and the sample centroid
    Bounds {
        #[command(flatten)]
        io: IOArgs,

        /// The sample table format (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<TableFormat>,
    },

    /// Run a scripted walk and report every step
    Walk {
        #[command(flatten)]
        io: IOArgs,

        /// The sample table format (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<TableFormat>,

        /// The priority order, comma separated (defaults to the column order)
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<String>>,

        /// One step per dimension, as DIRECTION or DIRECTION=VALUE
        #[arg(short, long = "step")]
        steps: Vec<walk::StepArg>,

        /// Answer value-less steps from a precomputed path cache
        #[arg(long)]
        cache: Option<PathBuf>,
    },

    /// Precompute every value-less walk into a path cache
    Precompute {
        #[command(flatten)]
        io: IOArgs,

        /// The sample table format (if omitted, will infer based on filename)
        #[arg(short, long)]
        format: Option<TableFormat>,

        /// Continue from a partial cache
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Worker threads (defaults to the configured value, then one per core)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Print the cached steps for a walk prefix
    Lookup {
        #[command(flatten)]
        io: IOArgs,

        /// The dimensions of the prefix, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<String>,

        /// The direction taken at each step, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        directions: Vec<Direction>,
    },
}
