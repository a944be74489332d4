//! Greeting handling of the plain transport, against a local listener.

use mailbox_core::{Error, Transport as _};
use tokio::io::AsyncWriteExt as _;
use tokio::net::TcpListener;

use imap_integration::PlainTransport;

/// Accept one connection, send `greeting` and hang up.
async fn serve_once(greeting: &'static [u8]) -> PlainTransport {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(greeting).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    PlainTransport {
        host: "127.0.0.1".to_owned(),
        port,
    }
}

#[tokio::test]
async fn greeted_connection_succeeds() {
    let transport = serve_once(b"* OK IMAP4rev1 ready\r\n").await;

    assert!(transport.connect().await.is_ok());
}

#[tokio::test]
async fn silent_hangup_is_a_connection_error() {
    let transport = serve_once(b"").await;

    let Err(err) = transport.connect().await else {
        panic!("connected without a greeting");
    };
    assert!(matches!(err, Error::Connection(_)), "{err:?}");
}

#[tokio::test]
async fn truncated_greeting_is_a_connection_error() {
    let transport = serve_once(b"* OK half a gree").await;

    let Err(err) = transport.connect().await else {
        panic!("connected on a truncated greeting");
    };
    assert!(matches!(err, Error::Connection(_)), "{err:?}");
}
