//! A single bounded IDLE wait.

use std::time::Duration;

use mailbox_core::{Error, IdleResponse, Mailbox};

/// Outcome of [`IdleWaiter::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The server reported a change; look for new mail.
    NewMail,

    /// The wait timed out and the connection was kept alive with `NOOP`.
    NoNewMail,

    /// A stop was requested during the wait.
    Interrupted,
}

/// Runs IDLE waits of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct IdleWaiter {
    /// Upper bound of one wait.
    timeout: Duration,
}

impl IdleWaiter {
    /// Waits last at most `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Enter IDLE, wait, and always leave IDLE again before returning.
    ///
    /// An error from the wait itself takes precedence over one from leaving
    /// IDLE.
    pub async fn wait<M, I>(&self, mailbox: &mut M, interrupt: I) -> Result<Wake, Error>
    where
        M: Mailbox,
        I: Future<Output = ()> + Send,
    {
        tracing::debug!(timeout_secs = self.timeout.as_secs(), "waiting for new emails");

        mailbox.idle_start().await?;
        let checked = mailbox.idle_check(self.timeout, interrupt).await;
        let done = mailbox.idle_done().await;

        let response = match (checked, done) {
            (Ok(response), Ok(())) => response,
            (Ok(_), Err(error)) => return Err(error),
            (Err(error), done) => {
                if let Err(done_error) = done {
                    tracing::debug!(error = %done_error, "leaving IDLE failed as well");
                }
                return Err(error);
            }
        };

        tracing::debug!(?response, "IDLE wait ended");

        match response {
            IdleResponse::NewData => Ok(Wake::NewMail),
            IdleResponse::Timeout => {
                tracing::debug!("no new emails");
                mailbox.noop().await?;
                Ok(Wake::NoNewMail)
            }
            IdleResponse::Interrupted => Ok(Wake::Interrupted),
        }
    }
}
