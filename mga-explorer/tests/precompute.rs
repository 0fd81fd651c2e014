use mga_core::models::{Dimension, Direction, FeasibleRegion, StepRule};
use mga_explorer::{
    Enumerator, ExplorerConfig, PathCache, PathKey, PrecomputeError, Progress, Session,
    io::TableFormat,
};
use mga_solver::clarabel::ClarabelOracle;
use rstest::*;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use regions::*;

#[fixture]
#[once]
fn full(mix: Arc<FeasibleRegion>) -> PathCache {
    Enumerator::new(&mix, ClarabelOracle::default(), StepRule::default())
        .precompute(None, &AtomicBool::new(false), None)
        .unwrap()
}

fn assert_paths_close(a: &PathCache, b: &PathCache) {
    assert_eq!(a.len(), b.len());
    for (key, records) in a.paths.iter() {
        let other = b
            .paths
            .get(key)
            .unwrap_or_else(|| panic!("missing {key}"));
        assert_eq!(records.len(), other.len(), "{key}");
        for (x, y) in records.iter().zip(other) {
            assert_eq!(x.step, y.step);
            assert_close(&x.solution(), &y.solution(), 1e-9);
        }
    }
}

#[rstest]
fn every_case_is_settled(mix: Arc<FeasibleRegion>, full: &PathCache) {
    assert_eq!(full.completed.len(), 6 * 27);
    assert_eq!(full.dimensions, mix.dimensions());
    assert_eq!(full.samples, 8);

    // Any first step is feasible
    for name in ["PV", "Wind", "Gas CHP"] {
        for direction in [Direction::Increase, Direction::Hold, Direction::Decrease] {
            assert!(full.lookup(&[name.into()], &[direction]).is_some());
        }
    }

    for (key, records) in full.paths.iter() {
        assert_eq!(records.len(), key.len());
        for (k, record) in records.iter().enumerate() {
            assert_eq!(record.step, k + 1);
            assert_eq!(record.weights.len(), 8);
            let total: f64 = record.weights.iter().sum();
            assert!((total - 1.0).abs() < 1e-6);
        }
        assert_eq!(key.to_string().parse::<PathKey>().unwrap(), *key);
    }
}

// Every value-less walk a live session can take must match the cache, and
// every walk it cannot take must be missing from it.
#[rstest]
fn live_sessions_agree_with_the_cache(mix: Arc<FeasibleRegion>, full: &PathCache) {
    let enumerator = Enumerator::new(&mix, ClarabelOracle::default(), StepRule::default());

    for index in 0..enumerator.cases().unwrap() {
        let case = enumerator.case(index).unwrap();
        let mut session = Session::new(
            mix.clone(),
            ClarabelOracle::default(),
            &ExplorerConfig::default(),
        );
        session.reorder(case.order.clone()).unwrap();

        for (k, (dimension, direction)) in case.order.iter().zip(&case.directions).enumerate() {
            let cached = full.lookup(&case.order[..=k], &case.directions[..=k]);
            let live = session
                .choose_direction(dimension, *direction)
                .map(|_| ());
            let live = live.and_then(|()| session.commit(None).cloned());
            match (live, cached) {
                (Ok(live), Some(cached)) => assert_close(&live, &cached.solution(), 1e-6),
                (Err(error), None) => {
                    assert!(error.is_infeasible(), "{error}");
                    break;
                }
                (live, cached) => panic!(
                    "case {index}, step {k}: live {:?} but cached {:?}",
                    live.is_ok(),
                    cached.is_some()
                ),
            }
        }
    }
}

#[rstest]
fn cached_sessions_skip_the_solver(mix: Arc<FeasibleRegion>, full: &PathCache) {
    let cache = Arc::new(full.clone());
    let enumerator = Enumerator::new(&mix, ClarabelOracle::default(), StepRule::default());
    let order = dims(&["Wind", "PV", "Gas CHP"]);
    let directions = [Direction::Hold, Direction::Increase, Direction::Hold];

    let oracle = Scripted::default();
    let mut session = Session::new(mix.clone(), &oracle, &ExplorerConfig::default())
        .with_cache(cache.clone())
        .unwrap();
    session.reorder(order.clone()).unwrap();

    for (k, (dimension, direction)) in order.iter().zip(directions).enumerate() {
        let cached = cache.lookup(&order[..=k], &directions[..=k]).unwrap();
        session.choose_direction(dimension, direction).unwrap();
        let anchor = session.commit(None).unwrap();
        assert_close(anchor, &cached.solution(), 1e-12);
    }
    // A top-priority Hold needs no solve, and every later step is cached
    assert_eq!(oracle.calls(), 0);

    let index = enumerator.index_of(&order, &directions).unwrap();
    assert_eq!(enumerator.case(index).unwrap().order, order);
}

#[rstest]
#[case::increase(Direction::Increase, 10.0)]
#[case::decrease(Direction::Decrease, 0.0)]
fn cached_first_steps_reach_the_global_extreme(
    mix: Arc<FeasibleRegion>,
    full: &PathCache,
    #[case] direction: Direction,
    #[case] expected: f64,
) {
    let oracle = Scripted::default();
    let mut session = Session::new(mix.clone(), &oracle, &ExplorerConfig::default())
        .with_cache(Arc::new(full.clone()))
        .unwrap();
    let pv: Dimension = "PV".into();

    let extreme = session.choose_direction(&pv, direction).unwrap().clone();
    assert!((extreme.point["PV"] - expected).abs() < 1e-6);
    assert_eq!(oracle.calls(), 0);

    let anchor = session.commit(None).unwrap().clone();
    assert_close(&anchor, &extreme, 1e-12);
    assert_eq!(oracle.calls(), 0);
}

#[rstest]
fn values_bypass_the_cache(mix: Arc<FeasibleRegion>, full: &PathCache) {
    let oracle = Scripted::default();
    let mut session = Session::new(mix.clone(), &oracle, &ExplorerConfig::default())
        .with_cache(Arc::new(full.clone()))
        .unwrap();

    session
        .choose_direction(&"PV".into(), Direction::Increase)
        .unwrap();
    let calls = oracle.calls();
    session.commit(Some(8.0)).unwrap();
    assert_eq!(oracle.calls(), calls + 1);
    assert_eq!(session.constraints().get("PV").lower(), Some(8.0));
}

#[rstest]
fn mismatched_caches_are_rejected(segment: Arc<FeasibleRegion>, full: &PathCache) {
    let session = Session::new(
        segment.clone(),
        ClarabelOracle::default(),
        &ExplorerConfig::default(),
    );
    assert!(session.with_cache(Arc::new(full.clone())).is_err());

    let result = Enumerator::new(&segment, ClarabelOracle::default(), StepRule::default())
        .precompute(Some(full.clone()), &AtomicBool::new(false), None);
    assert!(matches!(result, Err(PrecomputeError::Cache(_))));
}

#[rstest]
fn cancelled_runs_resume(mix: Arc<FeasibleRegion>, full: &PathCache) {
    let enumerator = Enumerator::new(&mix, ClarabelOracle::default(), StepRule::default())
        .progress_every(10);

    // Cancelled before the first case
    let cancel = AtomicBool::new(true);
    let empty = enumerator.precompute(None, &cancel, None).unwrap();
    assert!(empty.completed.is_empty());
    assert!(empty.is_empty());

    // Cancelled part of the way through
    let cancel = AtomicBool::new(false);
    let stop = |progress: Progress| {
        assert_eq!(progress.total, 162);
        if progress.done >= 40 {
            cancel.store(true, Ordering::SeqCst);
        }
    };
    let partial = enumerator.precompute(None, &cancel, Some(&stop)).unwrap();
    assert!(partial.completed.len() >= 40);
    assert!(partial.completed.len() < 162);

    // Round trip the partial cache through a file, then finish the run
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.json");
    let mut writer = BufWriter::new(File::create(&path).unwrap());
    partial.write(&mut writer).unwrap();
    writer.flush().unwrap();
    drop(writer);
    let partial = PathCache::read(BufReader::new(File::open(&path).unwrap())).unwrap();

    let resumed = enumerator
        .precompute(Some(partial), &AtomicBool::new(false), None)
        .unwrap();
    assert_eq!(resumed.completed, full.completed);
    assert_paths_close(&resumed, full);
}

#[rstest]
fn tables_agree_across_formats(#[files("tests/samples/*.json")] path: PathBuf) {
    let csv = path.with_extension("csv");
    let read = |path: &Path| {
        let format = TableFormat::from_path(path).unwrap();
        format.read(File::open(path).unwrap()).unwrap()
    };
    let (a, b) = (read(path.as_path()), read(csv.as_path()));

    assert_eq!(a.dimensions(), b.dimensions());
    assert_eq!(a.samples(), b.samples());
    for i in 0..a.dimensions().len() {
        assert_eq!(a.column(i), b.column(i));
    }
    let names = a
        .dimensions()
        .iter()
        .map(Dimension::as_str)
        .collect::<Vec<_>>();
    assert_eq!(names, ["PV", "Wind", "Gas CHP"]);
}
