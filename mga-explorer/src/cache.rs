use mga_core::models::{Dimension, Direction, FeasibleRegion, Map, Point, Solution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    collections::BTreeSet,
    fmt,
    io::{Read, Write},
    str::FromStr,
};
use thiserror::Error;

/// Identifies a walk prefix: the first k dimensions of a priority order and
/// the directions chosen for them.
///
/// Keys are stored as the JSON text `[[dimension, ...], [direction, ...]]`,
/// which decodes back to exactly the same tuples.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    /// The dimensions walked so far, in priority order
    pub priority: Vec<Dimension>,
    /// The direction taken at each of those steps
    pub directions: Vec<Direction>,
}

impl PathKey {
    /// Build a key from borrowed prefixes
    pub fn new(priority: &[Dimension], directions: &[Direction]) -> Self {
        Self {
            priority: priority.to_vec(),
            directions: directions.to_vec(),
        }
    }

    /// The number of steps the key covers
    pub fn len(&self) -> usize {
        self.directions.len()
    }

    /// True for the empty prefix
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text =
            serde_json::to_string(&(&self.priority, &self.directions)).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for PathKey {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (priority, directions) = serde_json::from_str::<(Vec<Dimension>, Vec<Direction>)>(s)
            .map_err(|e| CacheError::Key {
                key: s.to_owned(),
                reason: e.to_string(),
            })?;
        if priority.len() != directions.len() {
            return Err(CacheError::Key {
                key: s.to_owned(),
                reason: format!(
                    "{} dimensions but {} directions",
                    priority.len(),
                    directions.len()
                ),
            });
        }
        Ok(Self {
            priority,
            directions,
        })
    }
}

impl Serialize for PathKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The anchor reached after one step of a walk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// One-based step number
    pub step: usize,
    /// The convex weights of the anchor
    pub weights: Vec<f64>,
    /// The anchor itself
    pub point: Point,
}

impl StepRecord {
    /// The record as an oracle solution
    pub fn solution(&self) -> Solution {
        Solution {
            weights: self.weights.clone(),
            point: self.point.clone(),
        }
    }
}

impl From<(usize, Solution)> for StepRecord {
    fn from((step, solution): (usize, Solution)) -> Self {
        Self {
            step,
            weights: solution.weights,
            point: solution.point,
        }
    }
}

/// A lookup table of precomputed value-less walks.
///
/// Besides the paths themselves, the cache remembers which enumeration cases
/// have finished, so an interrupted precomputation can pick up where it
/// stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCache {
    /// The region's dimensions, in canonical order
    pub dimensions: Vec<Dimension>,
    /// The step fraction the paths were computed with
    pub epsilon: f64,
    /// The number of samples in the region
    pub samples: usize,
    /// Indices of the enumeration cases that ran to completion
    #[serde(default)]
    pub completed: BTreeSet<u64>,
    /// Every prefix reached, with the records of its steps
    #[serde(default)]
    pub paths: Map<PathKey, Vec<StepRecord>>,
}

/// The ways reading or using a cache can fail
#[derive(Debug, Error)]
pub enum CacheError {
    /// The file is not valid cache JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A path key does not decode
    #[error("malformed path key {key}: {reason}")]
    Key {
        /// The key as stored
        key: String,
        /// What is wrong with it
        reason: String,
    },
    /// The cache was built for a different region or step fraction
    #[error("cache does not match the region: {0}")]
    Mismatch(String),
}

impl PathCache {
    /// An empty cache for `region`
    pub fn new(region: &FeasibleRegion, epsilon: f64) -> Self {
        Self {
            dimensions: region.dimensions().to_vec(),
            epsilon,
            samples: region.samples(),
            completed: BTreeSet::new(),
            paths: Map::default(),
        }
    }

    /// Ensure the cache was built for this region and step fraction
    pub fn check(&self, region: &FeasibleRegion, epsilon: f64) -> Result<(), CacheError> {
        if self.dimensions != region.dimensions() {
            return Err(CacheError::Mismatch(format!(
                "dimensions {:?} differ from {:?}",
                self.dimensions,
                region.dimensions()
            )));
        }
        if self.samples != region.samples() {
            return Err(CacheError::Mismatch(format!(
                "{} samples, expected {}",
                self.samples,
                region.samples()
            )));
        }
        if self.epsilon != epsilon {
            return Err(CacheError::Mismatch(format!(
                "epsilon {}, expected {}",
                self.epsilon, epsilon
            )));
        }
        Ok(())
    }

    /// The records of every step along a prefix
    pub fn path(&self, priority: &[Dimension], directions: &[Direction]) -> Option<&[StepRecord]> {
        self.paths
            .get(&PathKey::new(priority, directions))
            .map(Vec::as_slice)
    }

    /// The anchor at the end of a prefix
    pub fn lookup(&self, priority: &[Dimension], directions: &[Direction]) -> Option<&StepRecord> {
        self.path(priority, directions)?.last()
    }

    /// Record a prefix, keeping any existing record for it
    pub fn insert(&mut self, key: PathKey, records: Vec<StepRecord>) {
        self.paths.entry(key).or_insert(records);
    }

    /// The number of stored prefixes
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if no prefix is stored
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Parse a cache from JSON
    pub fn read<R: Read>(reader: R) -> Result<Self, CacheError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the cache as JSON
    pub fn write<W: Write>(&self, writer: W) -> Result<(), CacheError> {
        Ok(serde_json::to_writer(writer, self)?)
    }
}
