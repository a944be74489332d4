//! Core traits for driving an IMAP mailbox.
//!
//! The relay talks to a server through three stages: a [`Transport`] opens a
//! connection and yields a [`Client`], which logs in to produce a [`Mailbox`].

use core::future::Future;
use core::time::Duration;

/// A per-message identifier, stable within a folder.
pub type Uid = u32;

/// Boxed source error carried by [`Error`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A message as retrieved from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Server UID of the message.
    pub uid: Uid,

    /// Raw RFC 822 octets.
    pub bytes: Vec<u8>,
}

/// Why an IDLE wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleResponse {
    /// The server pushed an untagged response.
    NewData,

    /// The timeout elapsed with no server data.
    Timeout,

    /// The caller-provided interrupt fired.
    Interrupted,
}

/// Session-level failures.
///
/// Any of these means the connection can no longer be trusted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket or TLS failure.
    #[error("connection: {0}")]
    Connection(#[source] BoxError),

    /// The server rejected the credentials.
    #[error("auth: {0}")]
    Auth(#[source] BoxError),

    /// Unexpected server response or command sequencing.
    #[error("protocol: {0}")]
    Protocol(#[source] BoxError),
}

impl Error {
    /// Construct a [`Error::Connection`].
    pub fn connection(source: impl Into<BoxError>) -> Self {
        Self::Connection(source.into())
    }

    /// Construct a [`Error::Auth`].
    pub fn auth(source: impl Into<BoxError>) -> Self {
        Self::Auth(source.into())
    }

    /// Construct a [`Error::Protocol`].
    pub fn protocol(source: impl Into<BoxError>) -> Self {
        Self::Protocol(source.into())
    }
}

/// Opens connections to the configured server.
pub trait Transport: Send + Sync {
    /// The connected, not yet authenticated, client.
    type Client: Client;

    /// Connect and read the server greeting.
    fn connect(&self) -> impl Future<Output = Result<Self::Client, Error>> + Send;
}

/// A connected client awaiting authentication.
pub trait Client: Send {
    /// The authenticated session.
    type Mailbox: Mailbox;

    /// Authenticate with `LOGIN`.
    fn login(
        self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<Self::Mailbox, Error>> + Send;
}

/// An authenticated IMAP session.
///
/// Between [`idle_start`](Mailbox::idle_start) and
/// [`idle_done`](Mailbox::idle_done) the session is in IDLE mode and accepts
/// no other command.
pub trait Mailbox: Send {
    /// `SELECT` a folder.
    fn select(&mut self, folder: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// `UID SEARCH UNSEEN`.
    fn search_unseen(&mut self) -> impl Future<Output = Result<Vec<Uid>, Error>> + Send;

    /// `UID FETCH <uids> RFC822`. Marks the messages seen.
    fn fetch_rfc822(
        &mut self,
        uids: &[Uid],
    ) -> impl Future<Output = Result<Vec<RawMessage>, Error>> + Send;

    /// Enter IDLE mode.
    fn idle_start(&mut self) -> impl Future<Output = Result<(), Error>> + Send;

    /// Block in IDLE until data arrives, `timeout` elapses, or `interrupt`
    /// completes.
    fn idle_check<I>(
        &mut self,
        timeout: Duration,
        interrupt: I,
    ) -> impl Future<Output = Result<IdleResponse, Error>> + Send
    where
        I: Future<Output = ()> + Send;

    /// Leave IDLE mode.
    fn idle_done(&mut self) -> impl Future<Output = Result<(), Error>> + Send;

    /// `NOOP`.
    fn noop(&mut self) -> impl Future<Output = Result<(), Error>> + Send;

    /// `LOGOUT`.
    fn logout(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}
