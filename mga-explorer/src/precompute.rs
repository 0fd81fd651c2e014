use crate::{CacheError, ExploreError, PathCache, PathKey, StepRecord, advance};
use mga_core::{
    models::{Constraints, Dimension, Direction, FeasibleRegion, RequestError, StepRule},
    ports::Oracle,
};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tracing::{Level, event, span};

/// One walk of the enumeration: a priority order and a direction per step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// `perm_index · 3ⁿ + direction_index`
    pub index: u64,
    /// The priority order
    pub order: Vec<Dimension>,
    /// The direction taken at each step
    pub directions: Vec<Direction>,
}

/// A snapshot of enumeration progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Cases finished, including those carried over from a resumed cache
    pub done: u64,
    /// Cases in the full enumeration
    pub total: u64,
    /// Cases in this run that reached their last step
    pub successful: u64,
}

/// The ways an enumeration can fail to start
#[derive(Debug, Error)]
pub enum PrecomputeError {
    /// `n! · 3ⁿ` does not fit the case index
    #[error("{0} dimensions are too many to enumerate")]
    TooLarge(usize),
    /// The resume cache is unusable
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// A case index past the end of the enumeration
    #[error("case {0} is outside the enumeration")]
    NoSuchCase(u64),
    /// A priority order or direction list that names no case
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// What replaying one case produced
#[derive(Debug)]
pub struct Replay {
    /// The anchor after each successful step
    pub records: Vec<StepRecord>,
    /// Why the walk stopped early, if it did
    pub stopped: Option<ExploreError>,
}

impl Replay {
    // Infeasible steps end a case normally; anything else leaves it to be retried.
    fn settled(&self) -> bool {
        self.stopped.as_ref().is_none_or(ExploreError::is_infeasible)
    }
}

/// Replays every value-less walk through a region.
///
/// For each priority order (lexicographic over the canonical dimension
/// indices) and each combination of directions (base-3 counting over
/// increase, hold, decrease, first step most significant), the walk starts
/// at the centroid and commits one step at a time with no value, exactly as
/// a [`Session`](crate::Session) does. Every prefix reached is recorded in a
/// [`PathCache`].
pub struct Enumerator<'a, O> {
    region: &'a FeasibleRegion,
    oracle: O,
    rule: StepRule,
    progress_every: u64,
}

impl<'a, O: Oracle> Enumerator<'a, O> {
    /// Enumerate walks through `region` with the given step rule
    pub fn new(region: &'a FeasibleRegion, oracle: O, rule: StepRule) -> Self {
        Self {
            region,
            oracle,
            rule,
            progress_every: 500,
        }
    }

    /// Report progress every `every` cases; zero disables reporting
    pub fn progress_every(mut self, every: usize) -> Self {
        self.progress_every = every as u64;
        self
    }

    /// The number of cases, `n! · 3ⁿ`
    pub fn cases(&self) -> Result<u64, PrecomputeError> {
        let n = self.region.dimensions().len();
        permutations(n)
            .and_then(|p| combinations(n).and_then(|c| p.checked_mul(c)))
            .ok_or(PrecomputeError::TooLarge(n))
    }

    /// Decode a case index into its priority order and directions
    pub fn case(&self, index: u64) -> Result<Case, PrecomputeError> {
        let dimensions = self.region.dimensions();
        let n = dimensions.len();
        if index >= self.cases()? {
            return Err(PrecomputeError::NoSuchCase(index));
        }
        let combos = combinations(n).ok_or(PrecomputeError::TooLarge(n))?;
        let (mut rank, mut digits) = (index / combos, index % combos);

        // Lehmer code: the leading digit picks among the unused indices
        let mut unused = (0..n).collect::<Vec<_>>();
        let mut order = Vec::with_capacity(n);
        for i in 0..n {
            let block = permutations(n - 1 - i).ok_or(PrecomputeError::TooLarge(n))?;
            let pick = (rank / block) as usize;
            rank %= block;
            order.push(dimensions[unused.remove(pick)].clone());
        }

        let mut directions = vec![Direction::Increase; n];
        for slot in directions.iter_mut().rev() {
            *slot = Direction::ALL[(digits % 3) as usize];
            digits /= 3;
        }

        Ok(Case {
            index,
            order,
            directions,
        })
    }

    /// The index of the case with this priority order and these directions
    pub fn index_of(
        &self,
        order: &[Dimension],
        directions: &[Direction],
    ) -> Result<u64, PrecomputeError> {
        let n = self.region.dimensions().len();
        if order.len() != n || directions.len() != n {
            return Err(RequestError::NotAPermutation.into());
        }

        let mut unused = (0..n).collect::<Vec<_>>();
        let mut rank = 0u64;
        for (i, dimension) in order.iter().enumerate() {
            let canonical = self.region.resolve(dimension)?;
            let position = unused
                .iter()
                .position(|&j| j == canonical)
                .ok_or(RequestError::NotAPermutation)?;
            unused.remove(position);
            let block = permutations(n - 1 - i).ok_or(PrecomputeError::TooLarge(n))?;
            rank += position as u64 * block;
        }

        let digits = directions.iter().fold(0u64, |acc, direction| {
            let digit = Direction::ALL
                .iter()
                .position(|d| d == direction)
                .unwrap_or_default();
            acc * 3 + digit as u64
        });

        let combos = combinations(n).ok_or(PrecomputeError::TooLarge(n))?;
        Ok(rank * combos + digits)
    }

    /// Walk one case from the centroid, stopping at its first failed step
    pub fn replay(&self, case: &Case) -> Replay {
        let _span = span!(Level::DEBUG, "case", index = case.index).entered();

        let mut constraints = Constraints::new();
        let mut anchor = self.region.centroid();
        let mut records = Vec::with_capacity(case.order.len());

        for (step, (dimension, direction)) in case.order.iter().zip(&case.directions).enumerate() {
            match advance(
                &self.oracle,
                self.region,
                &self.rule,
                &constraints,
                &anchor,
                dimension,
                *direction,
                step,
                None,
            ) {
                Ok((next, solution)) => {
                    records.push(StepRecord::from((step + 1, solution.clone())));
                    constraints = next;
                    anchor = solution;
                }
                Err(error) => {
                    if error.is_infeasible() {
                        event!(Level::TRACE, step, %dimension, %direction, %error, "case stopped");
                    } else {
                        event!(Level::ERROR, step, %dimension, %direction, %error, "case failed");
                    }
                    return Replay {
                        records,
                        stopped: Some(error),
                    };
                }
            }
        }

        Replay {
            records,
            stopped: None,
        }
    }

    /// Run every case not already completed in `resume`.
    ///
    /// Cases run in parallel on the current rayon pool. Setting `cancel`
    /// stops the run between cases; the cache returned then holds every case
    /// that finished, and can be passed back in to continue.
    pub fn precompute(
        &self,
        resume: Option<PathCache>,
        cancel: &AtomicBool,
        progress: Option<&(dyn Fn(Progress) + Sync)>,
    ) -> Result<PathCache, PrecomputeError> {
        let total = self.cases()?;
        let mut cache = match resume {
            Some(cache) => {
                cache.check(self.region, self.rule.epsilon())?;
                cache
            }
            None => PathCache::new(self.region, self.rule.epsilon()),
        };

        let done = AtomicU64::new(cache.completed.len() as u64);
        let successful = AtomicU64::new(0);
        let report = |done: u64| {
            let snapshot = Progress {
                done,
                total,
                successful: successful.load(Ordering::Relaxed),
            };
            event!(
                Level::INFO,
                done = snapshot.done,
                total = snapshot.total,
                successful = snapshot.successful,
                "precomputing paths"
            );
            if let Some(progress) = progress {
                progress(snapshot);
            }
        };

        event!(
            Level::INFO,
            total,
            resumed = cache.completed.len(),
            dimensions = self.region.dimensions().len(),
            "starting path enumeration"
        );

        let completed = &cache.completed;
        let results = (0..total)
            .into_par_iter()
            .filter(|index| !completed.contains(index))
            .filter_map(|index| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let case = self.case(index).ok()?;
                let replay = self.replay(&case);
                if replay.stopped.is_none() {
                    successful.fetch_add(1, Ordering::Relaxed);
                }
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                if self.progress_every > 0 && finished % self.progress_every == 0 {
                    report(finished);
                }
                Some((case, replay))
            })
            .collect::<Vec<_>>();

        for (case, replay) in results {
            let settled = replay.settled();
            for k in 0..replay.records.len() {
                cache.insert(
                    PathKey::new(&case.order[..=k], &case.directions[..=k]),
                    replay.records[..=k].to_vec(),
                );
            }
            if settled {
                cache.completed.insert(case.index);
            }
        }

        report(done.load(Ordering::Relaxed));
        if cancel.load(Ordering::Relaxed) {
            event!(
                Level::WARN,
                completed = cache.completed.len(),
                total,
                "path enumeration cancelled"
            );
        }
        Ok(cache)
    }
}

fn permutations(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}

fn combinations(n: usize) -> Option<u64> {
    3u64.checked_pow(u32::try_from(n).ok()?)
}
