use crate::AppConfig;
use mga_core::models::FeasibleRegion;
use mga_explorer::{Enumerator, PathCache};
use mga_solver::clarabel::ClarabelOracle;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{Level, event};

/// Enumerate every value-less walk on a dedicated rayon pool.
///
/// Ctrl-C stops the run between cases; the partial cache is still returned,
/// flagged as cancelled, so it can be written out and resumed later.
pub async fn run(
    region: FeasibleRegion,
    resume: Option<PathCache>,
    threads: Option<usize>,
    config: &AppConfig,
) -> anyhow::Result<(PathCache, bool)> {
    let cancel = Arc::new(AtomicBool::new(false));
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                event!(Level::WARN, "interrupt received, finishing in-flight cases");
                cancel.store(true, Ordering::Relaxed);
            }
        }
    });

    let oracle = ClarabelOracle::from(&config.solver);
    let rule = config.explorer.rule();
    let progress_every = config.precompute.progress_every;
    let flag = cancel.clone();
    let cache = tokio::task::spawn_blocking(move || -> anyhow::Result<PathCache> {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = threads {
            pool = pool.num_threads(threads);
        }
        let pool = pool.build()?;
        event!(Level::INFO, threads = pool.current_num_threads(), "worker pool ready");

        let cache = pool.install(|| {
            Enumerator::new(&region, oracle, rule)
                .progress_every(progress_every)
                .precompute(resume, &flag, None)
        })?;
        Ok(cache)
    })
    .await??;

    interrupt.abort();
    Ok((cache, cancel.load(Ordering::Relaxed)))
}
