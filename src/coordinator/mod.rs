//! Run coordination: pool management, collection, timing
//!
//! The coordinator owns the compute pool and the writer pool for the
//! duration of one run. It submits one task per partition, collects every
//! task's outcome **in submission order** over per-task channels, and
//! aggregates the outcomes into a [`RunReport`].
//!
//! Failure policy: only pre-dispatch validation and output-directory setup
//! abort a run. Everything after dispatch is isolated per task; a partition
//! that fails to persist, or whose worker disconnects mid-run, becomes a
//! failed outcome while its siblings proceed.

mod observer;
mod types;

pub use observer::{NullObserver, RunObserver};
pub use types::{RunReport, SetupError, TaskFailure, TaskOutcome, TaskState, TaskStatus};

use std::path::Path;
use std::time::Instant;

use crossbeam::channel::bounded;

use crate::persist::WriterPool;
use crate::search::space::{partition, Partition, SearchSpace};
use crate::search::worker::collect_primes;

/// Pool size used when host parallelism cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

/// Everything a run needs, resolved from config and CLI flags by the caller.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub space: SearchSpace,
    /// `None` means "size the pool to the host"; an explicit 0 is rejected.
    pub workers: Option<usize>,
    pub io_threads: usize,
    pub output_dir: std::path::PathBuf,
}

/// Resolve the requested worker count to a concrete pool size.
pub fn resolve_workers(requested: Option<usize>) -> Result<usize, SetupError> {
    match requested {
        Some(0) => Err(SetupError::InvalidWorkerCount(0)),
        Some(n) => Ok(n),
        None => Ok(match num_cpus::get() {
            0 => FALLBACK_WORKERS,
            n => n,
        }),
    }
}

/// Execute one search run.
///
/// Steps: validate the worker count, create the output directory, split the
/// space, spawn one scoped worker per partition alongside the writer pool,
/// then receive each task's outcome in submission order. A partition is
/// reported only after every partition before it has been collected, even
/// when it finishes first.
pub fn run(settings: &RunSettings, observer: &dyn RunObserver) -> Result<RunReport, SetupError> {
    let workers = resolve_workers(settings.workers)?;

    std::fs::create_dir_all(&settings.output_dir).map_err(|source| SetupError::OutputDir {
        path: settings.output_dir.clone(),
        source,
    })?;

    let partitions = partition(settings.space, workers)?;
    tracing::info!(
        "dispatching {} partitions over [{}, {}) with {} workers",
        partitions.len(),
        settings.space.lower,
        settings.space.upper,
        workers
    );

    let start = Instant::now();
    let pool = WriterPool::start(settings.io_threads);
    let output_dir = settings.output_dir.as_path();

    let mut outcomes: Vec<TaskOutcome> = Vec::with_capacity(partitions.len());
    let mut interrupted = false;

    let scope_result = crossbeam::thread::scope(|s| {
        let pool = &pool;

        // Submit one task per partition, each with its own outcome channel.
        let mut submitted = Vec::with_capacity(partitions.len());
        for part in &partitions {
            observer.task_state(part.id, TaskState::Created);
            let (outcome_tx, outcome_rx) = bounded(1);
            observer.task_state(part.id, TaskState::Submitted);
            s.spawn(move |_| {
                let outcome = execute_task(part, output_dir, pool, observer);
                let _ = outcome_tx.send(outcome);
            });
            submitted.push((part, outcome_rx));
        }

        // Collect in submission order, not completion order.
        for (part, outcome_rx) in submitted {
            let outcome = match outcome_rx.recv() {
                Ok(outcome) => outcome,
                Err(_) => {
                    // Worker went away without answering; record it and keep
                    // collecting the remaining tasks.
                    interrupted = true;
                    observer.task_state(part.id, TaskState::Failed);
                    TaskOutcome::disconnected(part.id, part.output_key.clone())
                }
            };
            observer.partition_finished(&outcome);
            outcomes.push(outcome);
        }
    });

    pool.shutdown();
    let wall_clock_secs = start.elapsed().as_secs_f64();

    if scope_result.is_err() {
        // A worker panicked; its outcome was already recorded as
        // disconnected during collection.
        interrupted = true;
        tracing::warn!("a worker thread panicked during the run");
    }

    let total_primes = outcomes
        .iter()
        .filter(|o| o.succeeded())
        .map(|o| o.count)
        .sum();

    Ok(RunReport {
        total_primes,
        outcomes,
        wall_clock_secs,
        workers,
        interrupted,
    })
}

/// One task: compute, persist, assemble the outcome.
///
/// The persistence ticket is awaited before the outcome is produced, so a
/// task never reports success while its file is still in flight.
fn execute_task(
    part: &Partition,
    output_dir: &Path,
    pool: &WriterPool,
    observer: &dyn RunObserver,
) -> TaskOutcome {
    observer.task_state(part.id, TaskState::Computing);
    let compute_start = Instant::now();
    let primes = collect_primes(part);
    let compute_ms = compute_start.elapsed().as_millis() as u64;
    let count = primes.len();
    tracing::debug!("partition {} computed {} primes", part.id, count);

    observer.task_state(part.id, TaskState::Persisting);
    let persist_start = Instant::now();
    let ticket = pool.submit(output_dir.join(&part.output_key), primes);
    let status = match ticket.wait() {
        Ok(()) => TaskStatus::Completed,
        Err(err) => {
            tracing::warn!("partition {} failed to persist: {err}", part.id);
            TaskStatus::Failed(TaskFailure::Io(err.to_string()))
        }
    };
    let persist_ms = persist_start.elapsed().as_millis() as u64;

    let terminal = if status == TaskStatus::Completed {
        TaskState::Completed
    } else {
        TaskState::Failed
    };
    observer.task_state(part.id, terminal);

    TaskOutcome {
        partition_id: part.id,
        output_key: part.output_key.clone(),
        count,
        status,
        compute_ms,
        persist_ms,
    }
}
