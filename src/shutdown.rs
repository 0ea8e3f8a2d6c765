//! Process-wide stop signal shared by the UI loop, the input thread and
//! the OS signal listener.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Default)]
struct StopState {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopState {
    fn signal(&self, reason: &'static str) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        tracing::info!(reason, "Shutdown requested");
        self.notify.notify_waiters();
        true
    }
}

/// Owner side of the stop signal; created once by the UI runtime.
#[derive(Default)]
pub struct ShutdownCoordinator {
    state: Arc<StopState>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if shutdown was already requested.
    pub fn signal(&self, reason: &'static str) -> bool {
        self.state.signal(reason)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }

    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Cloneable view of the stop signal.
#[derive(Clone)]
pub struct ShutdownHandle {
    state: Arc<StopState>,
}

impl ShutdownHandle {
    pub fn is_shutting_down(&self) -> bool {
        self.state.stopped.load(Ordering::SeqCst)
    }

    pub fn signal(&self, reason: &'static str) -> bool {
        self.state.signal(reason)
    }

    /// Resolve once shutdown is requested, immediately if it already was.
    pub async fn wait(&self) {
        // Register before reading the flag so a concurrent signal is not lost.
        let notified = self.state.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_shutting_down() {
            return;
        }
        notified.await;
    }
}

/// Resolve when the process receives Ctrl+C or, on Unix, SIGTERM.
///
/// In raw mode Ctrl+C arrives as a key event instead; this covers signals
/// sent from outside the terminal.
pub async fn wait_for_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
