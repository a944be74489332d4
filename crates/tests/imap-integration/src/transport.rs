//! Plain TCP access to the test server.

use std::time::Duration;

use async_imap::Client;
use imap_session::ImapClient;
use mailbox_core::Error;
use tokio::net::TcpStream;

/// Connect over plain TCP and read the greeting.
async fn connect_plain(host: &str, port: u16) -> std::io::Result<Client<TcpStream>> {
    let stream = TcpStream::connect((host, port)).await?;
    let mut client = Client::new(stream);

    match client.read_response().await {
        Some(Ok(_)) => Ok(client),
        Some(Err(err)) => Err(err),
        None => Err(std::io::Error::other("missing IMAP greeting")),
    }
}

/// A [`mailbox_core::Transport`] without TLS, for servers in test containers.
#[derive(Debug, Clone)]
pub struct PlainTransport {
    /// Server host.
    pub host: String,

    /// Server port.
    pub port: u16,
}

impl mailbox_core::Transport for PlainTransport {
    type Client = ImapClient<TcpStream>;

    async fn connect(&self) -> Result<Self::Client, Error> {
        let client = connect_plain(&self.host, self.port)
            .await
            .map_err(Error::connection)?;
        Ok(ImapClient::new(client))
    }
}

/// A raw session used to seed the server, retrying until it accepts logins.
pub async fn seed_session(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
) -> Result<async_imap::Session<TcpStream>, std::io::Error> {
    let try_connect = || async move {
        connect_plain(host, port)
            .await?
            .login(user, password)
            .await
            .map_err(|(err, _)| std::io::Error::other(err))
    };

    let mut attempts = 60u8;
    loop {
        let err = match try_connect().await {
            Ok(session) => return Ok(session),
            Err(err) => err,
        };

        let Some(attempts_left) = attempts.checked_sub(1) else {
            return Err(err);
        };

        attempts = attempts_left;
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
