//! Turning fetched messages into published events.

use event_publisher::{Publish, PublishError, Publisher};
use mail_event::OutboundEnvelope;
use mailbox_core::RawMessage;
use prometheus::IntCounter;

/// Why a single message was not published.
#[derive(Debug, thiserror::Error)]
pub enum MessageError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The message could not be parsed or decoded.
    #[error("mail event: {0}")]
    Event(#[from] mail_event::Error),

    /// The event could not be published.
    #[error("publish: {0}")]
    Publish(#[from] PublishError<E>),
}

/// Tally of one processed batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Messages published.
    pub published: usize,

    /// Messages dropped after an error.
    pub failed: usize,
}

/// Parses, shapes and publishes messages one at a time.
pub struct Pipeline<P> {
    /// Delivers the events.
    publisher: Publisher<P>,

    /// Zone for the `date` field.
    timezone: chrono_tz::Tz,

    /// Incremented per failed message.
    errors: IntCounter,
}

impl<P: Publish> Pipeline<P> {
    /// Create a pipeline.
    pub fn new(publisher: Publisher<P>, timezone: chrono_tz::Tz, errors: IntCounter) -> Self {
        Self {
            publisher,
            timezone,
            errors,
        }
    }

    /// The publisher in use.
    pub fn publisher(&self) -> &Publisher<P> {
        &self.publisher
    }

    /// Process a batch in order. A failed message is logged and counted and
    /// does not affect the others.
    pub async fn process_batch(&self, messages: Vec<RawMessage>) -> BatchReport {
        let mut report = BatchReport::default();

        for message in messages {
            match self.process_message(&message).await {
                Ok(()) => report.published += 1,
                Err(error) => {
                    report.failed += 1;
                    self.errors.inc();
                    tracing::error!(uid = message.uid, %error, "failed to relay email");
                }
            }
        }

        report
    }

    /// Parse one message and publish its event.
    pub async fn process_message(
        &self,
        message: &RawMessage,
    ) -> Result<(), MessageError<P::Error>> {
        let email = mail_event::parse(&message.bytes)?;
        let received = chrono::Local::now().naive_local();

        tracing::info!(
            uid = message.uid,
            from = %email.from,
            subject = %email.subject,
            "email received"
        );

        let envelope = OutboundEnvelope::new(email, self.timezone, received);
        self.publisher.publish(&envelope).await?;
        Ok(())
    }
}
