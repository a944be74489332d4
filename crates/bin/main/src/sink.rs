//! Publish sink writing events to stdout.

use tokio::io::AsyncWriteExt as _;

/// Writes one line per event: the topic, a retained marker, and the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl event_publisher::Publish for StdoutSink {
    type Error = std::io::Error;

    async fn publish(&self, topic: &str, payload: &str, retain: bool) -> Result<(), Self::Error> {
        let marker = if retain { " retained" } else { "" };
        let line = format!("{topic}{marker} {payload}\n");

        let mut stdout = tokio::io::stdout();
        stdout.write_all(line.as_bytes()).await?;
        stdout.flush().await
    }
}
