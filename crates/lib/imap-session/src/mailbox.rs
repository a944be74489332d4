//! Authenticated session.

use core::time::Duration;

use async_imap::extensions::idle::{Handle, IdleResponse as ImapIdleResponse};
use futures::TryStreamExt as _;
use mailbox_core::{Error, IdleResponse, RawMessage, Uid};

use crate::error::classify;

/// An authenticated [`async_imap`] session.
///
/// `async_imap` models IDLE as a separate handle that consumes the session,
/// so the session is tracked as a small state machine.
pub struct ImapSession<S: crate::Stream> {
    /// Current protocol state.
    state: State<S>,
}

/// Protocol state of an [`ImapSession`].
enum State<S: crate::Stream> {
    /// Ready for regular commands.
    Ready(async_imap::Session<S>),

    /// In IDLE mode.
    Idling(Handle<S>),

    /// Leaving IDLE failed and the session is gone.
    Lost,
}

impl<S: crate::Stream> ImapSession<S> {
    /// Wrap an authenticated session.
    pub fn new(session: async_imap::Session<S>) -> Self {
        Self {
            state: State::Ready(session),
        }
    }

    /// Borrow the session for a regular command.
    fn ready(&mut self) -> Result<&mut async_imap::Session<S>, Error> {
        match &mut self.state {
            State::Ready(session) => Ok(session),
            State::Idling(_) => Err(Error::protocol("command issued while in IDLE")),
            State::Lost => Err(Error::protocol("session lost after a failed IDLE exit")),
        }
    }
}

impl<S: crate::Stream> mailbox_core::Mailbox for ImapSession<S> {
    async fn select(&mut self, folder: &str) -> Result<(), Error> {
        let mailbox = self.ready()?.select(folder).await.map_err(classify)?;
        tracing::debug!(
            imap_mailbox = %folder,
            exists = mailbox.exists,
            "folder selected"
        );
        Ok(())
    }

    async fn search_unseen(&mut self) -> Result<Vec<Uid>, Error> {
        let uids = self
            .ready()?
            .uid_search("UNSEEN")
            .await
            .map_err(classify)?;

        let mut uids: Vec<Uid> = uids.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    async fn fetch_rfc822(&mut self, uids: &[Uid]) -> Result<Vec<RawMessage>, Error> {
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let uid_set = uids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let fetches: Vec<_> = self
            .ready()?
            .uid_fetch(&uid_set, "RFC822")
            .await
            .map_err(classify)?
            .try_collect()
            .await
            .map_err(classify)?;

        let messages = fetches
            .iter()
            .filter_map(|fetch| {
                let Some(uid) = fetch.uid else {
                    tracing::debug!(seq = fetch.message, "FETCH response without UID");
                    return None;
                };
                let Some(body) = fetch.body() else {
                    tracing::debug!(uid, "FETCH response without RFC822 body");
                    return None;
                };
                Some(RawMessage {
                    uid,
                    bytes: body.to_vec(),
                })
            })
            .collect();

        Ok(messages)
    }

    async fn idle_start(&mut self) -> Result<(), Error> {
        let session = match std::mem::replace(&mut self.state, State::Lost) {
            State::Ready(session) => session,
            other => {
                self.state = other;
                return Err(Error::protocol("IDLE requested outside of the ready state"));
            }
        };

        let mut handle = session.idle();
        let result = handle.init().await.map_err(classify);
        self.state = State::Idling(handle);
        result
    }

    async fn idle_check<I>(&mut self, timeout: Duration, interrupt: I) -> Result<IdleResponse, Error>
    where
        I: Future<Output = ()> + Send,
    {
        let State::Idling(handle) = &mut self.state else {
            return Err(Error::protocol("IDLE check outside of IDLE"));
        };

        let (idle_wait, stop) = handle.wait_with_timeout(timeout);
        let mut idle_wait = std::pin::pin!(idle_wait);
        let mut interrupt = std::pin::pin!(interrupt);

        let response = tokio::select! {
            response = &mut idle_wait => response,
            () = &mut interrupt => {
                // Dropping the stop source ends the wait with a manual interrupt.
                drop(stop);
                idle_wait.await
            }
        }
        .map_err(classify)?;

        Ok(match response {
            ImapIdleResponse::NewData(_) => IdleResponse::NewData,
            ImapIdleResponse::Timeout => IdleResponse::Timeout,
            ImapIdleResponse::ManualInterrupt => IdleResponse::Interrupted,
        })
    }

    async fn idle_done(&mut self) -> Result<(), Error> {
        let handle = match std::mem::replace(&mut self.state, State::Lost) {
            State::Idling(handle) => handle,
            other => {
                self.state = other;
                return Err(Error::protocol("IDLE DONE outside of IDLE"));
            }
        };

        let session = handle.done().await.map_err(classify)?;
        self.state = State::Ready(session);
        Ok(())
    }

    async fn noop(&mut self) -> Result<(), Error> {
        self.ready()?.noop().await.map_err(classify)
    }

    async fn logout(&mut self) -> Result<(), Error> {
        self.ready()?.logout().await.map_err(classify)
    }
}
