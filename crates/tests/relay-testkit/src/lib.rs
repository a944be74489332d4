//! Test doubles for the relay: an in-memory IMAP server implementing the
//! [`mailbox_core`] traits and a sink recording published events.

mod server;

pub use server::*;
pub use sink::*;

/// Build a minimal RFC 822 message.
pub fn message(from: &str, subject: &str, date: &str, body: &str) -> Vec<u8> {
    format!(
        "From: {from}\r\nTo: relay@example.com\r\nSubject: {subject}\r\nDate: {date}\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\r\n{body}\r\n"
    )
    .into_bytes()
}
