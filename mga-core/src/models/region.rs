use super::{Dimension, Map, RequestError};
use thiserror::Error;

/// A mapping from dimension to value.
///
/// Points reported by the engine are always convex combinations of the
/// samples, and their keys follow the region's dimension order.
pub type Point = Map<Dimension, f64>;

/// The raw sample table: for every dimension, its column of values.
pub type SampleTable = Map<Dimension, Vec<f64>>;

/// A feasible point together with the convex weights that produced it
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// One non-negative weight per sample, summing to one
    pub weights: Vec<f64>,
    /// The resulting value of every dimension
    pub point: Point,
}

/// The global extent of a dimension across all samples
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    /// The smallest sampled value (LB)
    pub lower: f64,
    /// The largest sampled value (UB)
    pub upper: f64,
}

impl Extent {
    /// `UB - LB`, zero only for degenerate inputs
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }
}

/// The ways a sample table can be unusable
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// The table has no columns
    #[error("sample table has no dimensions")]
    NoDimensions,
    /// The table has no rows
    #[error("sample table has no rows")]
    NoSamples,
    /// A dimension appears twice in the header
    #[error("dimension {0} appears more than once")]
    DuplicateDimension(Dimension),
    /// A column's length differs from the first column's
    #[error("dimension {dimension} has {found} samples, expected {expected}")]
    Ragged {
        /// The offending column
        dimension: Dimension,
        /// Length of the first column
        expected: usize,
        /// Length of the offending column
        found: usize,
    },
    /// A row's width differs from the header's
    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        /// Zero-based row index
        row: usize,
        /// Number of dimensions
        expected: usize,
        /// Number of values in the row
        found: usize,
    },
    /// A value is NaN or infinite
    #[error("sample {row} of {dimension} is not finite")]
    NonFinite {
        /// The offending column
        dimension: Dimension,
        /// Zero-based row index
        row: usize,
    },
}

/// The feasible region, approximated by the convex hull of a finite sample set.
///
/// Built once at startup and never mutated; everything downstream shares it
/// read-only. The column order of the input becomes the canonical dimension
/// order.
#[derive(Clone, Debug)]
pub struct FeasibleRegion {
    dimensions: Vec<Dimension>,
    index: Map<Dimension, usize>,
    columns: Vec<Vec<f64>>,
    extents: Vec<Extent>,
    samples: usize,
}

impl FeasibleRegion {
    /// Validate a column-oriented sample table and derive the global bounds
    pub fn load(table: SampleTable) -> Result<Self, DataError> {
        let samples = match table.first() {
            Some((_, column)) => column.len(),
            None => return Err(DataError::NoDimensions),
        };
        if samples == 0 {
            return Err(DataError::NoSamples);
        }

        let mut dimensions = Vec::with_capacity(table.len());
        let mut columns = Vec::with_capacity(table.len());
        let mut extents = Vec::with_capacity(table.len());

        for (dimension, column) in table {
            if column.len() != samples {
                return Err(DataError::Ragged {
                    dimension,
                    expected: samples,
                    found: column.len(),
                });
            }
            if let Some(row) = column.iter().position(|x| !x.is_finite()) {
                return Err(DataError::NonFinite { dimension, row });
            }

            let (lower, upper) = column
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                });

            dimensions.push(dimension);
            columns.push(column);
            extents.push(Extent { lower, upper });
        }

        let index = dimensions
            .iter()
            .enumerate()
            .map(|(i, dimension)| (dimension.clone(), i))
            .collect();

        Ok(Self {
            dimensions,
            index,
            columns,
            extents,
            samples,
        })
    }

    /// Build the region from a header and row-oriented samples, as read from
    /// a spreadsheet export.
    pub fn from_rows<R: IntoIterator<Item = Vec<f64>>>(
        dimensions: Vec<Dimension>,
        rows: R,
    ) -> Result<Self, DataError> {
        let mut columns = vec![Vec::new(); dimensions.len()];
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != dimensions.len() {
                return Err(DataError::RowWidth {
                    row,
                    expected: dimensions.len(),
                    found: values.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }

        let mut table = SampleTable::with_capacity(dimensions.len());
        for (dimension, column) in dimensions.into_iter().zip(columns) {
            if table.contains_key(&dimension) {
                return Err(DataError::DuplicateDimension(dimension));
            }
            table.insert(dimension, column);
        }
        Self::load(table)
    }

    /// The dimensions, in canonical order
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// The number of samples (m)
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// The canonical index of a dimension
    pub fn index_of(&self, dimension: &str) -> Option<usize> {
        self.index.get(dimension).copied()
    }

    /// Like [`index_of`](Self::index_of), but reporting unknown dimensions as a request error
    pub fn resolve(&self, dimension: &Dimension) -> Result<usize, RequestError> {
        self.index_of(dimension.as_str())
            .ok_or_else(|| RequestError::UnknownDimension(dimension.clone()))
    }

    /// The sampled values of the dimension at canonical index `index`
    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    /// The global extent of the dimension at canonical index `index`
    pub fn extent(&self, index: usize) -> Extent {
        self.extents[index]
    }

    /// The global extent of a named dimension
    pub fn extent_of(&self, dimension: &str) -> Option<Extent> {
        self.index_of(dimension).map(|i| self.extents[i])
    }

    /// Evaluate the convex combination given by `weights` in every dimension
    pub fn combine(&self, weights: &[f64]) -> Point {
        debug_assert_eq!(weights.len(), self.samples);
        self.dimensions
            .iter()
            .zip(self.columns.iter())
            .map(|(dimension, column)| {
                let value = column.iter().zip(weights).map(|(a, w)| a * w).sum();
                (dimension.clone(), value)
            })
            .collect()
    }

    /// The centroid of the sample set: every sample weighted `1/m`
    pub fn centroid(&self) -> Solution {
        let weights = vec![1.0 / self.samples as f64; self.samples];
        let point = self.combine(&weights);
        Solution { weights, point }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn table(columns: &[(&str, &[f64])]) -> SampleTable {
        columns
            .iter()
            .map(|(name, values)| (Dimension::from(*name), values.to_vec()))
            .collect()
    }

    #[test]
    fn derives_bounds_and_centroid() {
        let region =
            FeasibleRegion::load(table(&[("A", &[0.0, 10.0, 4.0]), ("B", &[10.0, 0.0, 2.0])]))
                .unwrap();

        assert_eq!(region.samples(), 3);
        let expected: [Dimension; 2] = ["A".into(), "B".into()];
        assert_eq!(region.dimensions(), &expected);

        let a = region.extent_of("A").unwrap();
        assert_eq!((a.lower, a.upper, a.range()), (0.0, 10.0, 10.0));

        let centroid = region.centroid();
        assert_abs_diff_eq!(centroid.weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.point["A"], 14.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centroid.point["B"], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(
            FeasibleRegion::load(SampleTable::default()).unwrap_err(),
            DataError::NoDimensions
        );
        assert_eq!(
            FeasibleRegion::load(table(&[("A", &[])])).unwrap_err(),
            DataError::NoSamples
        );
        assert!(matches!(
            FeasibleRegion::load(table(&[("A", &[1.0, 2.0]), ("B", &[1.0])])),
            Err(DataError::Ragged { found: 1, .. })
        ));
        assert!(matches!(
            FeasibleRegion::load(table(&[("A", &[1.0, f64::NAN])])),
            Err(DataError::NonFinite { row: 1, .. })
        ));
    }

    #[test]
    fn from_rows_checks_header() {
        let region = FeasibleRegion::from_rows(
            vec!["A".into(), "B".into()],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        )
        .unwrap();
        assert_eq!(region.column(1), &[10.0, 0.0]);

        assert!(matches!(
            FeasibleRegion::from_rows(vec!["A".into(), "B".into()], vec![vec![0.0]]),
            Err(DataError::RowWidth { row: 0, .. })
        ));
        assert_eq!(
            FeasibleRegion::from_rows(vec!["A".into(), "A".into()], vec![vec![0.0, 1.0]])
                .unwrap_err(),
            DataError::DuplicateDimension("A".into())
        );
    }
}
