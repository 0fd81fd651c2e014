use crate::CliError;
use clap::Args;
use mga_core::models::FeasibleRegion;
use mga_explorer::{PathCache, io::TableFormat};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::{Path, PathBuf},
    str::FromStr,
};

// Every subcommand reads one input and writes one output.
// This struct standardizes their implementation.
#[derive(Args)]
pub struct IOArgs {
    /// The input file ("-" implies stdin)
    #[arg(value_parser = clap::value_parser!(PathOrStd))]
    input: PathOrStd,

    /// The output file ("-" implies stdout)
    #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    output: PathOrStd,
}

impl IOArgs {
    pub fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        match &self.input {
            PathOrStd::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            PathOrStd::Std => Ok(Box::new(stdin().lock())),
        }
    }

    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        match &self.output {
            PathOrStd::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            PathOrStd::Std => Ok(Box::new(stdout().lock())),
        }
    }

    pub fn input_path(&self) -> Option<&Path> {
        match &self.input {
            PathOrStd::Path(path) => Some(path.as_path()),
            PathOrStd::Std => None,
        }
    }

    /// Read the input as a sample table, in the given format or the one its
    /// extension implies
    pub fn read_region(&self, format: Option<TableFormat>) -> anyhow::Result<FeasibleRegion> {
        let format = match format.or_else(|| self.input_path().and_then(TableFormat::from_path)) {
            Some(format) => format,
            None => return Err(CliError::FormatInference)?,
        };
        Ok(format.read(self.read()?)?)
    }

    /// Read the input as a path cache
    pub fn read_cache(&self) -> anyhow::Result<PathCache> {
        Ok(PathCache::read(self.read()?)?)
    }

    /// Write a value as pretty-printed JSON
    pub fn write_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let mut output = self.write()?;
        serde_json::to_writer_pretty(&mut output, value)?;
        writeln!(output)?;
        output.flush()?;
        Ok(())
    }
}

#[derive(Clone)]
enum PathOrStd {
    Path(PathBuf),
    Std,
}

impl FromStr for PathOrStd {
    type Err = <PathBuf as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Std)
        } else {
            Ok(Self::Path(s.parse()?))
        }
    }
}

/// Read a path cache from a file
pub fn open_cache(path: &Path) -> anyhow::Result<PathCache> {
    Ok(PathCache::read(BufReader::new(File::open(path)?))?)
}
