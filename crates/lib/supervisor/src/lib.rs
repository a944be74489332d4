//! Lightweight async harness for supervised, restartable work.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use core::future::Future;
use core::time::Duration;
use futures_util::FutureExt;


/// The panic payload type alias.
pub type PanicPayload = alloc::boxed::Box<dyn core::any::Any + Send + 'static>;

/// Event sent to the notifier.
#[derive(Debug)]
pub enum SupervisorEvent<T, E> {
    /// The work is about to be invoked.
    Started,

    /// The work has completed without an error or panic.
    ///
    /// It won't be restarted.
    Done {
        /// The returned value.
        value: T,
    },

    /// The work returned an error.
    ///
    /// It will be restarted unless a stop is requested.
    Error {
        /// The error that was returned by the work future.
        error: E,

        /// The time to wait before the next attempt.
        next_retry_in: Duration,
    },

    /// The work panicked.
    ///
    /// It will be restarted unless a stop is requested.
    Panicked {
        /// The captured panic payload.
        panic_payload: PanicPayload,

        /// The time to wait before the next attempt.
        next_retry_in: Duration,
    },

    /// A stop was requested before the work could be (re)started.
    Stopped,
}

/// Parameters for [`run`].
pub struct Params<Work, Notifier, Sleep, ShouldStop> {
    /// The work to run.
    pub work: Work,

    /// Notifier for events.
    pub notifier: Notifier,

    /// Sleep timer.
    ///
    /// May return early when a stop is requested.
    pub sleep: Sleep,

    /// Checked before every attempt.
    pub should_stop: ShouldStop,

    /// Delay after a failed attempt.
    pub retry_delay: Duration,

    /// Pause between any two attempts, on top of `retry_delay`.
    pub pause: Duration,
}

/// Run the work until it completes or a stop is requested, restarting it after
/// every error or panic.
pub async fn run<Work, WorkFut, Notifier, NotifierFut, Sleep, SleepFut, ShouldStop, Value, Error>(
    mut params: Params<Work, Notifier, Sleep, ShouldStop>,
) where
    Work: FnMut() -> WorkFut,
    WorkFut: Future<Output = Result<Value, Error>>,
    Notifier: FnMut(SupervisorEvent<Value, Error>) -> NotifierFut,
    NotifierFut: Future<Output = ()>,
    Sleep: FnMut(Duration) -> SleepFut,
    SleepFut: Future<Output = ()>,
    ShouldStop: FnMut() -> bool,
{
    loop {
        if (params.should_stop)() {
            (params.notifier)(SupervisorEvent::Stopped).await;
            return;
        }

        (params.notifier)(SupervisorEvent::Started).await;

        // Run the work and catch panics coming from the future.
        let work_future = core::panic::AssertUnwindSafe((params.work)());
        let result = work_future.catch_unwind().await;

        let next_retry_in = params.retry_delay;
        match result {
            Ok(Ok(value)) => {
                (params.notifier)(SupervisorEvent::Done { value }).await;
                return;
            }
            Ok(Err(error)) => {
                (params.notifier)(SupervisorEvent::Error {
                    error,
                    next_retry_in,
                })
                .await;
            }
            Err(panic_payload) => {
                (params.notifier)(SupervisorEvent::Panicked {
                    panic_payload,
                    next_retry_in,
                })
                .await;
            }
        }

        (params.sleep)(next_retry_in).await;
        (params.sleep)(params.pause).await;
    }
}
