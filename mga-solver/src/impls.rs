use mga_core::models::{Bound, ConstraintSet, Dimension, FeasibleRegion, RequestError};

/// Implementation using the Clarabel interior point solver
#[cfg(feature = "clarabel")]
pub mod clarabel;

/// A constrained dimension, resolved to its canonical index
pub(crate) struct Row {
    pub index: usize,
    pub bound: Bound,
}

/// Resolve the objective and every constrained dimension against the region.
///
/// Unconstrained entries are dropped, as they contribute no rows.
pub(crate) fn prepare(
    region: &FeasibleRegion,
    constraints: &ConstraintSet,
    objective: &Dimension,
) -> Result<(usize, Vec<Row>), RequestError> {
    let objective = region.resolve(objective)?;
    let rows = constraints
        .iter()
        .filter(|(_, bound)| !bound.is_unbounded())
        .map(|(dimension, bound)| {
            Ok(Row {
                index: region.resolve(dimension)?,
                bound: *bound,
            })
        })
        .collect::<Result<Vec<_>, RequestError>>()?;
    Ok((objective, rows))
}

/// Clip slightly negative weights to zero and renormalize onto the simplex.
///
/// Interior point methods stop a hair away from the boundary, so weights of
/// order `-1e-10` are routine.
pub(crate) fn project(mut weights: Vec<f64>) -> Vec<f64> {
    for w in weights.iter_mut() {
        if !w.is_finite() || *w < 0.0 {
            *w = 0.0;
        }
    }
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        for w in weights.iter_mut() {
            *w /= total;
        }
    }
    weights
}

/// Check a candidate solution against every constraint with the given slack
pub(crate) fn satisfies(
    region: &FeasibleRegion,
    rows: &[Row],
    weights: &[f64],
    tolerance: f64,
) -> bool {
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > tolerance || weights.iter().any(|w| *w < -tolerance) {
        return false;
    }
    rows.iter().all(|Row { index, bound }| {
        let value: f64 = region
            .column(*index)
            .iter()
            .zip(weights)
            .map(|(a, w)| a * w)
            .sum();
        let scale = region.extent(*index).range().max(1.0);
        bound.contains(value, tolerance * scale)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_clips_and_normalizes() {
        let weights = project(vec![-1e-10, 0.5, 0.5000001]);
        assert_eq!(weights[0], 0.0);
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn satisfies_allows_only_scaled_slack() {
        // A ranges over [0, 10], so the slack on its bound is 10 · tolerance
        let region = FeasibleRegion::from_rows(
            vec!["A".into(), "B".into()],
            vec![vec![0.0, 10.0], vec![10.0, 0.0]],
        )
        .unwrap();
        let rows = [Row {
            index: 0,
            bound: Bound::at_least(5.0),
        }];
        let tolerance = 1e-6;

        // A = 4.999995, inside the slack of 1e-5
        assert!(satisfies(&region, &rows, &[0.5 + 5e-7, 0.5 - 5e-7], tolerance));
        // A = 4.99998, outside it
        assert!(!satisfies(&region, &rows, &[0.5 + 2e-6, 0.5 - 2e-6], tolerance));
        // Bound met, but the weights leave the simplex
        assert!(!satisfies(&region, &rows, &[0.5 + 1e-6, 0.5 + 1e-6], tolerance));
        assert!(!satisfies(&region, &rows, &[0.5 - 1e-6, 0.5 - 1e-6], tolerance));
        // Negative weights beyond the tolerance are rejected outright
        assert!(!satisfies(&region, &[], &[1.0 + 1e-5, -1e-5], tolerance));
    }

    #[test]
    fn prepare_rejects_unknown_dimensions() {
        let region = FeasibleRegion::from_rows(
            vec!["A".into(), "B".into()],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let mut constraints = ConstraintSet::default();
        constraints.insert("C".into(), Bound::at_least(0.0));
        assert_eq!(
            prepare(&region, &constraints, &"A".into()).err(),
            Some(RequestError::UnknownDimension("C".into()))
        );
        assert_eq!(
            prepare(&region, &ConstraintSet::default(), &"Z".into()).err(),
            Some(RequestError::UnknownDimension("Z".into()))
        );
    }
}
