//! Implicit-TLS connections to an IMAP server.

mod tls;

pub use tls::ConnectorError;

/// The effective data stream type we use.
pub type Stream = tokio_rustls::client::TlsStream<tokio::net::TcpStream>;

/// The effective client type we use.
pub type Client = imap_session::ImapClient<Stream>;

/// Default port for IMAP over implicit TLS.
pub const DEFAULT_PORT: u16 = 993;

/// IMAP connect params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    /// Hostname or IP address of the IMAP server.
    pub host: String,

    /// IMAP port.
    pub port: u16,

    /// TLS server name (SNI).
    pub tls_server_name: String,
}

/// Errors returned while connecting to an IMAP server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TCP connection error.
    #[error("TCP connection error: {0}")]
    TcpConnect(#[source] std::io::Error),

    /// The TLS server name is not a valid DNS name or IP address.
    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    /// TLS handshake error.
    #[error("TLS handshake error: {0}")]
    TlsHandshake(#[source] std::io::Error),

    /// Reading the server greeting failed.
    #[error("IMAP greeting error: {0}")]
    Greeting(#[source] std::io::Error),

    /// The server closed the connection without a greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,
}

/// Connect to an IMAP server over implicit TLS and read its greeting.
pub async fn connect(
    connector: &tokio_rustls::TlsConnector,
    params: &Params,
) -> Result<Client, Error> {
    let Params {
        host,
        port,
        tls_server_name,
    } = params;

    tracing::debug!(
        imap_host = %host,
        imap_port = port,
        tls_server_name = %tls_server_name,
        "connecting to an IMAP server"
    );

    let server_name = rustls::pki_types::ServerName::try_from(tls_server_name.clone())
        .map_err(|_| Error::InvalidServerName(tls_server_name.clone()))?;

    let tcp_stream = tokio::net::TcpStream::connect((host.as_str(), *port))
        .await
        .map_err(Error::TcpConnect)?;
    let tls_stream = connector
        .connect(server_name, tcp_stream)
        .await
        .map_err(Error::TlsHandshake)?;

    let client = read_greeting(tls_stream).await?;
    Ok(imap_session::ImapClient::new(client))
}

/// Wrap an established stream in an IMAP client once the server greets us.
pub async fn read_greeting<T>(stream: T) -> Result<async_imap::Client<T>, Error>
where
    T: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + std::fmt::Debug + Send,
{
    let mut client = async_imap::Client::new(stream);
    client
        .read_response()
        .await
        .ok_or(Error::MissingGreeting)?
        .map_err(Error::Greeting)?;
    Ok(client)
}

/// Connects to one configured server, reusing a single TLS configuration.
#[derive(Clone)]
pub struct ImapTransport {
    /// Where to connect.
    params: Params,

    /// Prepared TLS connector.
    connector: tokio_rustls::TlsConnector,
}

impl ImapTransport {
    /// Prepare a transport trusting the system root certificates.
    pub fn new(params: Params) -> Result<Self, ConnectorError> {
        let connector = tls::connector()?;
        Ok(Self { params, connector })
    }

    /// The params this transport connects with.
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl std::fmt::Debug for ImapTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImapTransport")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl mailbox_core::Transport for ImapTransport {
    type Client = Client;

    async fn connect(&self) -> Result<Self::Client, mailbox_core::Error> {
        connect(&self.connector, &self.params)
            .await
            .map_err(mailbox_core::Error::connection)
    }
}
