use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::sleep;
use tracing::debug;

use crate::corpus::Corpus;
use crate::error::AppResult;
use crate::shutdown::ShutdownReceiver;

use super::transport::{Connection, TransportKind};

/// Totals written by one worker before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub records: u64,
    pub bytes: u64,
    /// Completed passes over the whole corpus.
    pub passes: u64,
}

impl WorkerStats {
    fn record_sent(&mut self, len: usize) {
        self.records = self.records.saturating_add(1);
        self.bytes = self
            .bytes
            .saturating_add(u64::try_from(len).unwrap_or(u64::MAX));
    }

    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            records: self.records.saturating_add(other.records),
            bytes: self.bytes.saturating_add(other.bytes),
            passes: self.passes.saturating_add(other.passes),
        }
    }
}

pub(super) struct WorkerContext {
    pub(super) id: usize,
    pub(super) endpoint: SocketAddr,
    pub(super) transport: TransportKind,
    pub(super) sleep: Duration,
    pub(super) corpus: Arc<Corpus>,
}

/// Connects once, then streams the corpus in order until shutdown.
///
/// Every write and pacing sleep is raced against `shutdown_rx`, so the worker
/// returns promptly even while blocked on a slow receiver.
pub(super) async fn run_worker(
    context: WorkerContext,
    mut shutdown_rx: ShutdownReceiver,
) -> AppResult<WorkerStats> {
    let mut stats = WorkerStats::default();

    let mut connection = tokio::select! {
        _ = shutdown_rx.recv() => return Ok(stats),
        connection = Connection::open(context.transport, context.endpoint) => connection?,
    };
    debug!(
        worker = context.id,
        endpoint = %connection.endpoint(),
        transport = connection.kind().as_str(),
        "Worker connected"
    );

    if context.corpus.is_empty() {
        debug!(worker = context.id, "Corpus is empty, idling until shutdown");
        drop(shutdown_rx.recv().await);
        return Ok(stats);
    }

    loop {
        if shutdown_requested(&mut shutdown_rx) {
            return Ok(stats);
        }

        for record in context.corpus.iter() {
            tokio::select! {
                _ = shutdown_rx.recv() => return Ok(stats),
                result = connection.send(record.as_bytes()) => result?,
            }
            stats.record_sent(record.len());

            if !context.sleep.is_zero() {
                tokio::select! {
                    _ = shutdown_rx.recv() => return Ok(stats),
                    () = sleep(context.sleep) => {}
                }
            }
        }

        stats.passes = stats.passes.saturating_add(1);
    }
}

fn shutdown_requested(shutdown_rx: &mut ShutdownReceiver) -> bool {
    match shutdown_rx.try_recv() {
        Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty) => false,
    }
}
