//! Relay counters.

use prometheus::{IntCounter, Registry};

/// Counters updated by the worker.
#[derive(Clone)]
pub struct Metrics {
    /// Messages retrieved from the server.
    pub received: IntCounter,

    /// Failed sessions and failed messages.
    pub errors: IntCounter,

    /// Events handed to the sink.
    pub published: IntCounter,
}

impl Metrics {
    /// Create unregistered counters.
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            received: IntCounter::new("received_emails", "Total received emails")?,
            errors: IntCounter::new(
                "received_emails_errors",
                "Total errors while receiving emails",
            )?,
            published: IntCounter::new("published_emails", "Total published emails")?,
        })
    }

    /// Create the counters and register them with `registry`.
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let metrics = Self::new()?;
        registry.register(Box::new(metrics.received.clone()))?;
        registry.register(Box::new(metrics.errors.clone()))?;
        registry.register(Box::new(metrics.published.clone()))?;
        Ok(metrics)
    }
}
