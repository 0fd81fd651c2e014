use approx::assert_abs_diff_eq;
use mga_core::{
    models::{Bound, ConstraintSet, Dimension, FeasibleRegion, RequestError, Sense, Solution},
    ports::{Oracle, Solve},
};
use mga_solver::clarabel::{ClarabelError, ClarabelOracle};
use rstest::*;

#[fixture]
fn oracle() -> ClarabelOracle {
    ClarabelOracle::default()
}

// Two samples on the anti-diagonal: the hull is the segment A + B = 10.
#[fixture]
fn segment() -> FeasibleRegion {
    FeasibleRegion::from_rows(
        vec!["A".into(), "B".into()],
        vec![vec![0.0, 10.0], vec![10.0, 0.0]],
    )
    .unwrap()
}

// A small five-dimensional sample set with a non-trivial hull. The values
// are deterministic but irregular enough that no bound lands on a symmetry.
#[fixture]
fn mix() -> FeasibleRegion {
    let dimensions = ["PV", "Wind", "Coal", "Nuclear", "Gas CHP"]
        .into_iter()
        .map(Dimension::from)
        .collect::<Vec<_>>();
    let rows = (0..24)
        .map(|j| {
            (0..5)
                .map(|d| {
                    let t = (j * 7 + d * 13) as f64;
                    50.0 + 40.0 * (t * 0.37).sin() + 5.0 * d as f64
                })
                .collect()
        })
        .collect::<Vec<Vec<f64>>>();
    FeasibleRegion::from_rows(dimensions, rows).unwrap()
}

fn constraints(entries: &[(&str, Bound)]) -> ConstraintSet {
    entries
        .iter()
        .map(|(name, bound)| (Dimension::from(*name), *bound))
        .collect()
}

fn solve(
    oracle: &ClarabelOracle,
    region: &FeasibleRegion,
    set: &ConstraintSet,
    objective: &str,
    sense: Sense,
) -> Solve {
    oracle
        .optimize(region, set, &objective.into(), sense)
        .unwrap()
}

fn assert_feasible(region: &FeasibleRegion, set: &ConstraintSet, solution: &Solution) {
    let tol = 1e-6;
    assert_eq!(solution.weights.len(), region.samples());
    assert_abs_diff_eq!(solution.weights.iter().sum::<f64>(), 1.0, epsilon = tol);
    assert!(solution.weights.iter().all(|w| *w >= -tol));
    for (dimension, bound) in set.iter() {
        let scale = region.extent_of(dimension.as_str()).unwrap().range().max(1.0);
        assert!(
            bound.contains(solution.point[dimension], tol * scale),
            "{dimension} = {} violates {bound:?}",
            solution.point[dimension]
        );
    }
}

#[rstest]
fn maximizing_reaches_the_extreme(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let solution = solve(&oracle, &segment, &ConstraintSet::default(), "A", Sense::Maximize)
        .optimal()
        .unwrap();

    assert_abs_diff_eq!(solution.point["A"], 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(solution.point["B"], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(solution.weights[1], 1.0, epsilon = 1e-6);
}

#[rstest]
fn every_dimension_moves_with_the_weights(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let set = constraints(&[("A", Bound::at_least(10.0))]);
    let solution = solve(&oracle, &segment, &set, "A", Sense::Minimize)
        .optimal()
        .unwrap();

    assert_abs_diff_eq!(solution.point["A"], 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(solution.point["B"], 0.0, epsilon = 1e-6);
}

#[rstest]
fn two_sided_bounds_hold(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let set = constraints(&[("B", Bound::between(3.0, 4.0))]);

    let high = solve(&oracle, &segment, &set, "A", Sense::Maximize)
        .optimal()
        .unwrap();
    assert_abs_diff_eq!(high.point["A"], 7.0, epsilon = 1e-6);

    let low = solve(&oracle, &segment, &set, "A", Sense::Minimize)
        .optimal()
        .unwrap();
    assert_abs_diff_eq!(low.point["A"], 6.0, epsilon = 1e-6);
}

#[rstest]
fn inverted_bounds_are_infeasible(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let set = constraints(&[("A", Bound::between(6.0, 4.0))]);
    assert_eq!(
        solve(&oracle, &segment, &set, "B", Sense::Minimize),
        Solve::Infeasible
    );
}

#[rstest]
fn out_of_hull_is_infeasible(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let set = constraints(&[("A", Bound::at_least(6.0)), ("B", Bound::at_least(6.0))]);
    assert_eq!(
        solve(&oracle, &segment, &set, "A", Sense::Maximize),
        Solve::Infeasible
    );
}

#[rstest]
fn nan_bounds_are_ignored(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let set = constraints(&[("A", Bound::new(Some(f64::NAN), Some(2.0)))]);
    let solution = solve(&oracle, &segment, &set, "A", Sense::Minimize)
        .optimal()
        .unwrap();
    assert_abs_diff_eq!(solution.point["A"], 0.0, epsilon = 1e-6);
}

#[rstest]
fn unknown_dimensions_are_rejected(oracle: ClarabelOracle, segment: FeasibleRegion) {
    let result = oracle.optimize(
        &segment,
        &ConstraintSet::default(),
        &"Hydro".into(),
        Sense::Minimize,
    );
    assert!(matches!(
        result,
        Err(ClarabelError::Request(RequestError::UnknownDimension(_)))
    ));
}

#[rstest]
#[case::unconstrained(&[])]
#[case::one_sided(&[("PV", Bound::at_least(70.0))])]
#[case::band(&[("Wind", Bound::between(40.0, 60.0)), ("Coal", Bound::at_most(70.0))])]
#[case::pinned(&[("Nuclear", Bound::between(62.0, 62.0))])]
fn solutions_respect_constraints(
    oracle: ClarabelOracle,
    mix: FeasibleRegion,
    #[case] entries: &[(&str, Bound)],
) {
    let set = constraints(entries);
    for objective in mix.dimensions() {
        for sense in [Sense::Minimize, Sense::Maximize] {
            match oracle.optimize(&mix, &set, objective, sense).unwrap() {
                Solve::Optimal(solution) => assert_feasible(&mix, &set, &solution),
                other => panic!("{objective} {sense:?}: expected a solution, got {other:?}"),
            }
        }
    }
}

#[rstest]
fn optimum_dominates_centroid(oracle: ClarabelOracle, mix: FeasibleRegion) {
    let centroid = mix.centroid();
    for objective in mix.dimensions() {
        let high = solve(&oracle, &mix, &ConstraintSet::default(), objective.as_str(), Sense::Maximize)
            .optimal()
            .unwrap();
        let low = solve(&oracle, &mix, &ConstraintSet::default(), objective.as_str(), Sense::Minimize)
            .optimal()
            .unwrap();
        let extent = mix.extent_of(objective.as_str()).unwrap();

        assert_abs_diff_eq!(high.point[objective], extent.upper, epsilon = 1e-5);
        assert_abs_diff_eq!(low.point[objective], extent.lower, epsilon = 1e-5);
        assert!(low.point[objective] <= centroid.point[objective]);
        assert!(high.point[objective] >= centroid.point[objective]);
    }
}
