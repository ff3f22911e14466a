//! Replay engine: a pool of independent workers streaming the corpus in a
//! loop for a bounded wall-clock duration.
mod engine;
mod transport;
mod worker;


use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::corpus::InputMode;

pub use engine::{RunSummary, StopReason, run};
pub use transport::{Connection, TransportKind, resolve_destination};
pub use worker::WorkerStats;

pub const DEFAULT_DESTINATION: &str = "127.0.0.1:1514";
pub const DEFAULT_RUN_DURATION: Duration = Duration::from_secs(60 * 60);

/// Finished run configuration. Built once from the command line and only
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    pub file: PathBuf,
    pub input: InputMode,
    pub destination: String,
    pub transport: TransportKind,
    /// Pause after every record; zero disables pacing.
    pub sleep: Duration,
    pub workers: NonZeroUsize,
    pub duration: Duration,
}

impl ReplayConfig {
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            input: InputMode::Text,
            destination: DEFAULT_DESTINATION.to_owned(),
            transport: TransportKind::Stream,
            sleep: Duration::ZERO,
            workers: default_workers(),
            duration: DEFAULT_RUN_DURATION,
        }
    }
}

/// One worker per available CPU, falling back to a single worker.
#[must_use]
pub fn default_workers() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}
