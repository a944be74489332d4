//! The supervised watch loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use event_publisher::{Publish, Publisher};
use mailbox_core::{Error, Transport};
use supervisor::SupervisorEvent;

use crate::{
    IdleWaiter, LOOP_PAUSE, MessageFetcher, Metrics, Pipeline, RETRY_DELAY, Session, Settings,
    Wake, WorkerState,
};

/// Everything the worker needs from the host.
pub struct Collaborators<T, P> {
    /// Opens connections to the server.
    pub transport: T,

    /// Receives published events.
    pub publish: P,

    /// Relay settings.
    pub settings: Settings,

    /// Counters to update.
    pub metrics: Metrics,
}

/// Watches the folder and relays new mail until asked to stop.
pub struct Worker<T, P> {
    transport: T,
    settings: Settings,
    fetcher: MessageFetcher,
    idle: IdleWaiter,
    pipeline: Pipeline<P>,
    metrics: Metrics,

    /// Set once the backlog has been skipped; it is only skipped on the first
    /// successful login.
    backlog_skipped: AtomicBool,
}

impl<T: Transport, P: Publish> Worker<T, P> {
    /// Assemble a worker.
    pub fn new(collaborators: Collaborators<T, P>) -> Self {
        let Collaborators {
            transport,
            publish,
            settings,
            metrics,
        } = collaborators;

        let publisher = Publisher::new(publish, metrics.published.clone());
        let pipeline = Pipeline::new(publisher, settings.timezone, metrics.errors.clone());

        Self {
            transport,
            fetcher: MessageFetcher::new(metrics.received.clone()),
            idle: IdleWaiter::new(settings.idle_timeout),
            pipeline,
            settings,
            metrics,
            backlog_skipped: AtomicBool::new(false),
        }
    }

    /// The sink events are published to.
    pub fn sink(&self) -> &P {
        self.pipeline.publisher().sink()
    }

    /// Run one session: connect, log in, select, then wait and relay until a
    /// stop is requested or something fails.
    pub async fn run_session(&self, state: &WorkerState) -> Result<(), Error> {
        let mut session = Session::new(&self.transport, &self.settings);
        session.connect().await?;
        session.login().await?;
        session.select_folder().await?;

        if !self.backlog_skipped.load(Ordering::Acquire) {
            session.skip_unread().await?;
            self.backlog_skipped.store(true, Ordering::Release);
        }

        state.set_logged_in(true);

        while !state.exit_requested() {
            let mailbox = session.mailbox()?;
            match self.idle.wait(mailbox, state.exit_signal()).await? {
                Wake::NewMail => {
                    let messages = self.fetcher.fetch_unseen(mailbox).await?;
                    let report = self.pipeline.process_batch(messages).await;
                    tracing::debug!(
                        published = report.published,
                        failed = report.failed,
                        "batch relayed"
                    );
                }
                Wake::NoNewMail => {}
                Wake::Interrupted => break,
            }
        }

        state.set_logged_in(false);
        session.logout().await;
        Ok(())
    }

    fn on_supervisor_event(&self, state: &WorkerState, event: SupervisorEvent<(), Error>) {
        match event {
            SupervisorEvent::Started => tracing::debug!("starting IMAP session"),
            SupervisorEvent::Done { value: () } => tracing::debug!("IMAP session closed"),
            SupervisorEvent::Error {
                error,
                next_retry_in,
            } => {
                state.set_logged_in(false);
                self.metrics.errors.inc();
                tracing::error!(
                    %error,
                    retry_in_secs = next_retry_in.as_secs(),
                    "IMAP session failed"
                );
                tracing::debug!(?error, "IMAP session failure details");
            }
            SupervisorEvent::Panicked {
                panic_payload,
                next_retry_in,
            } => {
                state.set_logged_in(false);
                self.metrics.errors.inc();
                tracing::error!(
                    panic = panic_message(&panic_payload),
                    retry_in_secs = next_retry_in.as_secs(),
                    "IMAP session panicked"
                );
            }
            SupervisorEvent::Stopped => tracing::debug!("stop requested"),
        }
    }
}

/// Run `worker` until `state` requests an exit, reconnecting after every
/// failure.
pub async fn run<T: Transport, P: Publish>(worker: Arc<Worker<T, P>>, state: Arc<WorkerState>) {
    let worker = &*worker;
    let state = &*state;

    supervisor::run(supervisor::Params {
        work: move || worker.run_session(state),
        notifier: move |event| {
            worker.on_supervisor_event(state, event);
            std::future::ready(())
        },
        sleep: move |duration| state.sleep(duration),
        should_stop: move || state.exit_requested(),
        retry_delay: RETRY_DELAY,
        pause: LOOP_PAUSE,
    })
    .await;

    tracing::debug!("mail reader stopped");
}

fn panic_message(payload: &supervisor::PanicPayload) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
