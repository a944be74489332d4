//! [`async_imap`] implementation of the [`mailbox_core`] traits.
//!
//! Works over any stream, so the same code serves TLS connections in
//! production and plain TCP in tests.

mod auth;
mod error;
mod mailbox;

pub use mailbox::ImapSession;

/// Bounds every stream used with this crate must satisfy.
pub trait Stream:
    tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug
{
}

impl<S> Stream for S where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug
{
}

/// A connected client that has received the server greeting.
pub struct ImapClient<S: Stream> {
    /// The underlying client.
    inner: async_imap::Client<S>,
}

impl<S: Stream> ImapClient<S> {
    /// Wrap a client whose greeting has already been read.
    pub fn new(inner: async_imap::Client<S>) -> Self {
        Self { inner }
    }
}

impl<S: Stream> mailbox_core::Client for ImapClient<S> {
    type Mailbox = ImapSession<S>;

    async fn login(
        self,
        username: &str,
        password: &str,
    ) -> Result<Self::Mailbox, mailbox_core::Error> {
        let session = auth::login(self.inner, username, password).await?;
        Ok(ImapSession::new(session))
    }
}
