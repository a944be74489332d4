//! Outbound wire record.

use chrono::NaiveDateTime;

use crate::{ParsedEmail, date};

/// The JSON payload published for every parsed email.
///
/// Field declaration order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutboundEnvelope {
    /// Sender.
    pub from: String,

    /// Subject line.
    pub subject: String,

    /// Send date in the target timezone, whole seconds.
    pub date: String,

    /// Local processing time, whole seconds.
    pub received: String,

    /// Text body.
    pub message: Option<String>,
}

impl OutboundEnvelope {
    /// Build the envelope for a parsed email received at `received`.
    pub fn new(email: ParsedEmail, timezone: chrono_tz::Tz, received: NaiveDateTime) -> Self {
        Self {
            date: date::format_date(&email.date, timezone),
            received: date::format_received(&received),
            from: email.from,
            subject: email.subject,
            message: email.body,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
