//! Docker-backed end-to-end relay tests.

use std::error::Error;
use std::time::Duration;

use mail_relay::{Collaborators, Metrics, Password, Relay, Settings};
use relay_testkit::RecordingSink;

const IMAP_USER: &str = "relay";
const IMAP_PASSWORD: &str = "secret";

type TestResult = Result<(), Box<dyn Error + Send + Sync>>;

async fn eventually(what: &str, mut condition: impl FnMut() -> bool) -> TestResult {
    for _ in 0..120 {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err(format!("timed out waiting for {what}").into())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn skips_backlog_then_relays_new_mail() -> TestResult {
    imap_integration::require_integration_tests_enabled()?;

    let container = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    let host = container.get_host().await?.to_string();
    let port = container
        .get_host_port_ipv4(imap_integration::IMAP_PORT)
        .await?;

    let mut seeder = imap_integration::seed_session(&host, port, IMAP_USER, IMAP_PASSWORD).await?;
    for subject in ["backlog 1", "backlog 2", "backlog 3"] {
        let message = relay_testkit::message(
            "alice@example.com",
            subject,
            "Mon, 15 Jan 2024 09:30:00 +0000",
            "old",
        );
        seeder.append("INBOX", None, None, &message).await?;
    }

    let metrics = Metrics::new()?;
    let mut relay = Relay::init(Collaborators {
        transport: imap_integration::PlainTransport { host, port },
        publish: RecordingSink::new(),
        settings: Settings {
            idle_timeout: Duration::from_secs(10),
            ..Settings::new(IMAP_USER, Password::new(IMAP_PASSWORD))
        },
        metrics: metrics.clone(),
    });
    relay.update();
    eventually("login", || relay.is_logged_in()).await?;

    let message = relay_testkit::message(
        "bob@example.com",
        "fresh",
        "Tue, 16 Jan 2024 12:00:00 +0100",
        "new mail",
    );
    seeder.append("INBOX", None, None, &message).await?;
    eventually("publish", || !relay.sink().published().is_empty()).await?;

    let published = relay.sink().published();
    assert_eq!(published.len(), 1);
    let json = published[0].json();
    assert_eq!(json["from"], "bob@example.com");
    assert_eq!(json["subject"], "fresh");
    assert_eq!(json["date"], "2024-01-16T11:00:00+00:00");
    assert_eq!(metrics.received.get(), 1);

    relay.stop().await;
    seeder.logout().await?;

    Ok(())
}
