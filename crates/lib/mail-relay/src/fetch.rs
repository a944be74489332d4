//! Retrieval of unseen messages.

use mailbox_core::{Error, Mailbox, RawMessage};
use prometheus::IntCounter;

/// Fetches every unseen message of the selected folder.
#[derive(Clone)]
pub struct MessageFetcher {
    /// Incremented per retrieved message.
    received: IntCounter,
}

impl MessageFetcher {
    /// Count retrieved messages in `received`.
    pub fn new(received: IntCounter) -> Self {
        Self { received }
    }

    /// Search for unseen messages and fetch them in one batch, marking them
    /// seen.
    pub async fn fetch_unseen<M: Mailbox>(&self, mailbox: &mut M) -> Result<Vec<RawMessage>, Error> {
        let uids = mailbox.search_unseen().await?;
        tracing::debug!(count = uids.len(), "unseen emails found");
        if uids.is_empty() {
            return Ok(Vec::new());
        }

        let messages = mailbox.fetch_rfc822(&uids).await?;
        self.received.inc_by(messages.len() as u64);
        Ok(messages)
    }
}
