//! State shared between the host and the worker task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Exit request and login status of the worker.
#[derive(Debug, Default)]
pub struct WorkerState {
    /// Cancelled once the host asks the worker to stop.
    exit: CancellationToken,

    /// Set while a session is logged in and watching the folder.
    logged_in: AtomicBool,
}

impl WorkerState {
    /// Ask the worker to stop at the next opportunity.
    pub fn request_exit(&self) {
        self.exit.cancel();
    }

    /// Whether a stop was requested.
    pub fn exit_requested(&self) -> bool {
        self.exit.is_cancelled()
    }

    /// Resolves once a stop is requested.
    pub fn exit_signal(&self) -> WaitForCancellationFuture<'_> {
        self.exit.cancelled()
    }

    /// Whether the worker currently holds a logged in session.
    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::Acquire)
    }

    pub(crate) fn set_logged_in(&self, value: bool) {
        self.logged_in.store(value, Ordering::Release);
    }

    /// Sleep for `duration`, returning early on a stop request.
    pub async fn sleep(&self, duration: Duration) {
        tokio::select! {
            () = tokio::time::sleep(duration) => {}
            () = self.exit.cancelled() => {}
        }
    }
}
