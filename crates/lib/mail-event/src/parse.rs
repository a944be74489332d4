//! Raw message parsing.

use chrono::{DateTime, FixedOffset};
use mailparse::MailHeaderMap as _;

use crate::{Error, ParseError, body, date};

/// A message reduced to the fields the relay publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEmail {
    /// Decoded `From` header.
    pub from: String,

    /// Decoded `Subject` header, empty when absent.
    pub subject: String,

    /// `Date` header with the offset the sender declared.
    pub date: DateTime<FixedOffset>,

    /// Text body, if the message has a usable one.
    pub body: Option<String>,

    /// Charset the body was declared in.
    pub charset: Option<String>,
}

/// Parse raw RFC 822 octets.
pub fn parse(raw: &[u8]) -> Result<ParsedEmail, Error> {
    let mail = mailparse::parse_mail(raw).map_err(ParseError::Mime)?;

    let from_header = mail
        .headers
        .get_first_header("From")
        .ok_or(ParseError::MissingHeader("From"))?;
    let from = from_header.get_value().trim().to_owned();
    if from.is_empty() {
        return Err(ParseError::MissingHeader("From").into());
    }
    // Addresses are checked on the raw header: a decoded display name may
    // carry commas or other specials that only the encoded form quotes.
    match mailparse::addrparse_header(from_header) {
        Ok(addrs) if !addrs.is_empty() => {}
        _ => return Err(ParseError::MalformedFrom { value: from }.into()),
    }

    let date = mail
        .headers
        .get_first_value("Date")
        .filter(|value| !value.trim().is_empty())
        .ok_or(ParseError::MissingHeader("Date"))?;
    let date = date::parse_date(&date)?;

    let subject = mail.headers.get_first_value("Subject").unwrap_or_default();

    let (body, charset) = match body::extract(&mail)? {
        Some(raw_body) => {
            let text = body::decode_text(&raw_body.bytes, raw_body.charset.as_deref())?;
            (Some(text), raw_body.charset)
        }
        None => (None, None),
    };

    Ok(ParsedEmail {
        from,
        subject,
        date,
        body,
        charset,
    })
}
