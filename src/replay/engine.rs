use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::corpus::Corpus;
use crate::error::{AppError, AppResult};
use crate::shutdown::ShutdownSender;

use super::ReplayConfig;
use super::transport::resolve_destination;
use super::worker::{WorkerContext, WorkerStats, run_worker};

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    DurationElapsed,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub elapsed: Duration,
    pub workers: usize,
    pub totals: WorkerStats,
}

struct WorkerFailure {
    worker: usize,
    error: AppError,
}

enum RunOutcome {
    Stopped(StopReason),
    Failed(WorkerFailure),
}

/// Spawns `config.workers` replay workers over `corpus` and waits for the
/// run to end.
///
/// The run timer starts before the destination is resolved. The run ends
/// when `config.duration` elapses, when anything broadcasts on `shutdown_tx`,
/// or when any worker fails. In every case all workers are told to stop and
/// joined before this returns.
///
/// # Errors
///
/// Returns an error when the destination cannot be resolved, or the first
/// connect or write error reported by any worker.
pub async fn run(
    config: &ReplayConfig,
    corpus: Corpus,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunSummary> {
    run_with_resolver(
        config,
        corpus,
        shutdown_tx,
        resolve_destination(&config.destination),
    )
    .await
}

pub(super) async fn run_with_resolver<R>(
    config: &ReplayConfig,
    corpus: Corpus,
    shutdown_tx: &ShutdownSender,
    resolve: R,
) -> AppResult<RunSummary>
where
    R: Future<Output = AppResult<SocketAddr>>,
{
    let workers = config.workers.get();
    let started = Instant::now();
    let run_timer = sleep(config.duration);
    tokio::pin!(run_timer);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let endpoint = tokio::select! {
        resolved = resolve => resolved?,
        () = &mut run_timer => {
            warn!(destination = %config.destination, "Run ended while resolving the destination");
            return Ok(finish(StopReason::DurationElapsed, started, workers, WorkerStats::default()));
        }
        _ = shutdown_rx.recv() => {
            return Ok(finish(StopReason::Interrupted, started, workers, WorkerStats::default()));
        }
    };
    let corpus = Arc::new(corpus);

    info!(
        workers,
        sleep = ?config.sleep,
        destination = %config.destination,
        endpoint = %endpoint,
        transport = config.transport.as_str(),
        records = corpus.len(),
        duration = ?config.duration,
        "Starting replay"
    );

    let (failure_tx, mut failure_rx) = mpsc::channel::<WorkerFailure>(workers);
    let mut handles = Vec::with_capacity(workers);

    for id in 0..workers {
        let context = WorkerContext {
            id,
            endpoint,
            transport: config.transport,
            sleep: config.sleep,
            corpus: Arc::clone(&corpus),
        };
        let worker_shutdown_rx = shutdown_tx.subscribe();
        let failure_tx = failure_tx.clone();

        handles.push(tokio::spawn(async move {
            match run_worker(context, worker_shutdown_rx).await {
                Ok(stats) => stats,
                Err(error) => {
                    drop(failure_tx.send(WorkerFailure { worker: id, error }).await);
                    WorkerStats::default()
                }
            }
        }));
    }
    drop(failure_tx);

    let outcome = tokio::select! {
        () = &mut run_timer => RunOutcome::Stopped(StopReason::DurationElapsed),
        _ = shutdown_rx.recv() => RunOutcome::Stopped(StopReason::Interrupted),
        Some(failure) = failure_rx.recv() => RunOutcome::Failed(failure),
    };

    drop(shutdown_tx.send(()));
    let mut totals = WorkerStats::default();
    for joined in join_all(handles).await {
        match joined {
            Ok(stats) => totals = totals.merge(stats),
            Err(err) => warn!("Replay worker task failed to join: {}", err),
        }
    }

    match outcome {
        RunOutcome::Stopped(reason) => Ok(finish(reason, started, workers, totals)),
        RunOutcome::Failed(failure) => {
            debug!(
                worker = failure.worker,
                "Stopped all workers after a worker failure"
            );
            Err(failure.error)
        }
    }
}

fn finish(
    reason: StopReason,
    started: Instant,
    workers: usize,
    totals: WorkerStats,
) -> RunSummary {
    let summary = RunSummary {
        reason,
        elapsed: started.elapsed(),
        workers,
        totals,
    };
    info!(
        reason = ?summary.reason,
        elapsed = ?summary.elapsed,
        records = summary.totals.records,
        bytes = summary.totals.bytes,
        passes = summary.totals.passes,
        "Replay finished"
    );
    summary
}
