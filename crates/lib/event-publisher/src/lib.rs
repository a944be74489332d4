//! Delivery of mail events to a publish/subscribe sink.
//!
//! The sink itself belongs to the host; this crate only shapes the payload and
//! counts what got through.

/// Topic every envelope is published on.
pub const TOPIC: &str = "message";

/// The publish capability supplied by the host.
pub trait Publish: Send + Sync {
    /// Delivery failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver `payload` on `topic`, optionally as a retained message.
    fn publish(
        &self,
        topic: &str,
        payload: &str,
        retain: bool,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Errors returned while publishing an envelope.
#[derive(Debug, thiserror::Error)]
pub enum PublishError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The envelope could not be serialized.
    #[error("serialize: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The sink rejected the payload.
    #[error("deliver: {0}")]
    Deliver(#[source] E),
}

/// Serializes envelopes and hands them to the sink.
pub struct Publisher<P> {
    /// The host's publish capability.
    sink: P,

    /// Incremented once per delivered envelope.
    published: prometheus::IntCounter,
}

impl<P: Publish> Publisher<P> {
    /// Wrap a sink, counting deliveries in `published`.
    pub fn new(sink: P, published: prometheus::IntCounter) -> Self {
        Self { sink, published }
    }

    /// The wrapped sink.
    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Publish one envelope as retained JSON on [`TOPIC`].
    pub async fn publish(
        &self,
        envelope: &mail_event::OutboundEnvelope,
    ) -> Result<(), PublishError<P::Error>> {
        let payload = envelope.to_json().map_err(PublishError::Serialize)?;
        tracing::info!(topic = TOPIC, %payload, "publishing email event");

        self.sink
            .publish(TOPIC, &payload, true)
            .await
            .map_err(PublishError::Deliver)?;

        self.published.inc();
        Ok(())
    }
}
