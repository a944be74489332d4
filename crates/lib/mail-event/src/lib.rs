//! Conversion of raw RFC 822 mail into the structured events the relay
//! publishes.
//!
//! This crate does no I/O: [`parse`] turns raw octets into a [`ParsedEmail`],
//! and [`OutboundEnvelope::new`] turns that into the wire record.

mod body;
mod date;
mod envelope;
mod error;
mod parse;

pub use body::decode_text;
pub use date::{format_date, format_received, parse_date};
pub use envelope::OutboundEnvelope;
pub use error::*;
pub use parse::{ParsedEmail, parse};
