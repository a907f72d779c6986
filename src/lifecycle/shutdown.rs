//! Shutdown coordination between the signal listener and the HTTP server.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Sending half: fired once by the signal listener (or a test).
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// Receiving half handed to `HttpServer::run`.
///
/// Resolves when shutdown is triggered or every `Shutdown` handle is gone,
/// so a dropped coordinator never leaves the server running unattended.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// A signal for one more task to drain on.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the signal. Returns how many tasks were told.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Tasks still holding a `ShutdownSignal`.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Wait until shutdown is requested.
    pub async fn fired(mut self) {
        match self.rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => {
                tracing::info!("Shutdown requested, draining in-flight requests");
            }
            Err(RecvError::Closed) => {
                tracing::warn!("Shutdown coordinator dropped, stopping");
            }
        }
    }
}
