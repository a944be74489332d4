//! Main entrypoint.

use std::time::Duration;

use color_eyre::eyre::eyre;
use prometheus::Encoder as _;

mod sink;

/// How often the worker task is checked for liveness.
const HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let config = config_load::with_default_env_var().await?;
    let config_bringup::Bringup { params, settings } = config_bringup::bringup(&config)?;
    drop(config);

    tracing::info!(
        imap_host = %params.host,
        imap_port = params.port,
        imap_mailbox = %settings.folder,
        timezone = %settings.timezone,
        "starting mail relay"
    );

    let registry = prometheus::Registry::new();
    let metrics = mail_relay::Metrics::register(&registry)?;
    let transport = imap_connect::ImapTransport::new(params)?;

    let mut relay = mail_relay::Relay::init(mail_relay::Collaborators {
        transport,
        publish: sink::StdoutSink,
        settings,
        metrics,
    });
    relay.update();

    let mut health_check = tokio::time::interval(HEALTH_CHECK_INTERVAL);
    let outcome = loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break result.map_err(Into::into);
            }
            _ = health_check.tick() => {
                if !relay.is_healthy() {
                    break Err(eyre!("mail reader stopped unexpectedly"));
                }
            }
        }
    };

    relay.stop().await;
    log_metrics(&registry);

    outcome
}

/// Dump the final counter values.
fn log_metrics(registry: &prometheus::Registry) {
    let mut buffer = Vec::new();
    match prometheus::TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        Ok(()) => tracing::debug!(metrics = %String::from_utf8_lossy(&buffer), "final metrics"),
        Err(error) => tracing::warn!(%error, "failed to encode metrics"),
    }
}
