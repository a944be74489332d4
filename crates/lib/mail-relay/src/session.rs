//! Connection lifecycle for one IMAP session.

use mailbox_core::{Client as _, Error, Mailbox as _, Transport};

use crate::Settings;

/// The mailbox type a transport eventually yields.
pub type MailboxOf<T> = <<T as Transport>::Client as mailbox_core::Client>::Mailbox;

/// How far the session got.
enum Link<C, M> {
    /// Nothing open.
    Disconnected,

    /// Greeting received, not authenticated.
    Connected(C),

    /// Authenticated.
    LoggedIn(M),
}

/// One connect, login, select sequence against the configured server.
pub struct Session<'a, T: Transport> {
    /// Opens the connection.
    transport: &'a T,

    /// Credentials and folder.
    settings: &'a Settings,

    /// Current progress.
    link: Link<T::Client, MailboxOf<T>>,
}

impl<'a, T: Transport> Session<'a, T> {
    /// A disconnected session.
    pub fn new(transport: &'a T, settings: &'a Settings) -> Self {
        Self {
            transport,
            settings,
            link: Link::Disconnected,
        }
    }

    /// Whether `LOGIN` has succeeded.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.link, Link::LoggedIn(_))
    }

    /// Open the connection. Does nothing when already connected.
    pub async fn connect(&mut self) -> Result<(), Error> {
        if !matches!(self.link, Link::Disconnected) {
            return Ok(());
        }

        tracing::info!("connecting to IMAP server");
        let client = self.transport.connect().await?;
        self.link = Link::Connected(client);
        Ok(())
    }

    /// Authenticate. Does nothing when already logged in.
    pub async fn login(&mut self) -> Result<(), Error> {
        let client = match std::mem::replace(&mut self.link, Link::Disconnected) {
            Link::Connected(client) => client,
            Link::LoggedIn(mailbox) => {
                self.link = Link::LoggedIn(mailbox);
                return Ok(());
            }
            Link::Disconnected => return Err(Error::protocol("LOGIN before connecting")),
        };

        let settings = self.settings;
        tracing::info!(imap_username = %settings.username, "logging in to IMAP server");
        let mailbox = client
            .login(&settings.username, settings.password.as_str())
            .await?;
        self.link = Link::LoggedIn(mailbox);
        Ok(())
    }

    /// Select the configured folder.
    pub async fn select_folder(&mut self) -> Result<(), Error> {
        let settings = self.settings;
        tracing::info!(imap_mailbox = %settings.folder, "selecting IMAP folder");
        self.mailbox()?.select(&settings.folder).await
    }

    /// Mark every unseen message seen without handing it on.
    ///
    /// Returns how many were skipped; zero when skipping is disabled.
    pub async fn skip_unread(&mut self) -> Result<usize, Error> {
        if !self.settings.skip_unread {
            return Ok(0);
        }

        let mailbox = self.mailbox()?;
        let uids = mailbox.search_unseen().await?;
        tracing::info!(count = uids.len(), "skipping unread emails");
        if !uids.is_empty() {
            mailbox.fetch_rfc822(&uids).await?;
        }
        Ok(uids.len())
    }

    /// The logged in mailbox.
    pub fn mailbox(&mut self) -> Result<&mut MailboxOf<T>, Error> {
        match &mut self.link {
            Link::LoggedIn(mailbox) => Ok(mailbox),
            _ => Err(Error::protocol("mailbox used before LOGIN")),
        }
    }

    /// Send `LOGOUT` if logged in. Failures are only logged.
    pub async fn logout(mut self) {
        let Link::LoggedIn(mut mailbox) = std::mem::replace(&mut self.link, Link::Disconnected)
        else {
            return;
        };

        match mailbox.logout().await {
            Ok(()) => tracing::debug!("logged out"),
            Err(error) => tracing::warn!(%error, "IMAP logout failed"),
        }
    }
}
