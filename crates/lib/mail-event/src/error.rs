//! Error types.

/// Errors returned while converting a raw message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message structure or its required headers are unusable.
    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    /// The body could not be decoded with its declared charset.
    #[error("charset: {0}")]
    Charset(#[from] CharsetError),
}

/// Malformed message structure or headers.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The MIME structure could not be parsed.
    #[error("MIME structure: {0}")]
    Mime(#[source] mailparse::MailParseError),

    /// A required header is absent or empty.
    #[error("missing \"{0}\" header")]
    MissingHeader(&'static str),

    /// The `From` header does not hold an address list.
    #[error("malformed \"From\" header {value:?}")]
    MalformedFrom {
        /// The offending header value.
        value: String,
    },

    /// The `Date` header is not a valid RFC 2822 date.
    #[error("malformed \"Date\" header {value:?}")]
    MalformedDate {
        /// The offending header value.
        value: String,
    },
}

/// Body bytes that do not decode with the declared charset.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum CharsetError {
    /// The charset label is not known.
    #[error("unknown charset \"{0}\"")]
    Unknown(String),

    /// The body contains byte sequences invalid in the charset.
    #[error("invalid byte sequence for charset \"{0}\"")]
    Malformed(String),
}
