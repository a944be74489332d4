//! Host-facing lifecycle.

use std::sync::Arc;

use event_publisher::Publish;
use mailbox_core::Transport;
use tokio::task::JoinHandle;

use crate::{Collaborators, Worker, WorkerState, worker};

/// The relay as seen by its host: created once, started by
/// [`update`](Relay::update), polled with [`is_healthy`](Relay::is_healthy)
/// and shut down with [`stop`](Relay::stop).
pub struct Relay<T, P> {
    worker: Arc<Worker<T, P>>,
    state: Arc<WorkerState>,
    task: Option<JoinHandle<()>>,
}

impl<T, P> Relay<T, P>
where
    T: Transport + 'static,
    P: Publish + 'static,
{
    /// Prepare the relay without starting it.
    pub fn init(collaborators: Collaborators<T, P>) -> Self {
        tracing::debug!(
            imap_username = %collaborators.settings.username,
            imap_mailbox = %collaborators.settings.folder,
            "initializing mail relay"
        );

        Self {
            worker: Arc::new(Worker::new(collaborators)),
            state: Arc::new(WorkerState::default()),
            task: None,
        }
    }

    /// Start the worker task unless it is already running or a stop was
    /// requested.
    pub fn update(&mut self) {
        if self.task.is_some() || self.state.exit_requested() {
            return;
        }

        tracing::info!("starting mail reader");
        let task = tokio::spawn(worker::run(
            Arc::clone(&self.worker),
            Arc::clone(&self.state),
        ));
        self.task = Some(task);
    }

    /// Whether the worker task is alive.
    pub fn is_healthy(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Whether the worker currently holds a logged in session.
    pub fn is_logged_in(&self) -> bool {
        self.state.is_logged_in()
    }

    /// The sink events are published to.
    pub fn sink(&self) -> &P {
        self.worker.sink()
    }

    /// Request an exit and wait for the worker task to finish.
    pub async fn stop(&mut self) {
        tracing::debug!("stopping mail relay");
        self.state.request_exit();

        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::error!(%error, "mail reader task failed");
            }
        }

        tracing::debug!("mail relay stopped");
    }
}
