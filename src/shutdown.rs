use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// A single `()` fans out to every subscriber; later sends are redundant.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY)
}

/// Process signal that ends a run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopSignal {
    Interrupt,
    Terminate,
}

impl StopSignal {
    const fn as_str(self) -> &'static str {
        match self {
            StopSignal::Interrupt => "SIGINT",
            StopSignal::Terminate => "SIGTERM",
        }
    }
}

/// Turns the first Ctrl-C (or SIGTERM on unix) into a shutdown broadcast.
///
/// The receiver is subscribed before the task is spawned, so a shutdown sent
/// right after this returns still ends the task.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_rx.recv() => {}
            stop = next_stop_signal() => {
                info!(signal = stop.as_str(), "Stop signal received, stopping workers");
                drop(shutdown_tx.send(()));
            }
        }
    })
}

#[cfg(unix)]
async fn next_stop_signal() -> StopSignal {
    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => tokio::select! {
            () = interrupt() => StopSignal::Interrupt,
            _ = terminate.recv() => StopSignal::Terminate,
        },
        Err(err) => {
            warn!("Failed to register SIGTERM handler: {}", err);
            interrupt().await;
            StopSignal::Interrupt
        }
    }
}

#[cfg(not(unix))]
async fn next_stop_signal() -> StopSignal {
    interrupt().await;
    StopSignal::Interrupt
}

/// Resolves on Ctrl-C; never resolves when the handler cannot be installed.
async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
