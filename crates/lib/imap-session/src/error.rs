//! Mapping of [`async_imap`] errors onto the session error taxonomy.

use async_imap::error::Error as ImapError;
use mailbox_core::Error;

/// Classify an error from any command other than `LOGIN`.
pub(crate) fn classify(err: ImapError) -> Error {
    match err {
        ImapError::Io(_) | ImapError::ConnectionLost => Error::connection(err),
        _ => Error::protocol(err),
    }
}

/// Classify an error from `LOGIN`: a server refusal is an auth failure.
pub(crate) fn classify_login(err: ImapError) -> Error {
    match err {
        ImapError::Io(_) | ImapError::ConnectionLost => Error::connection(err),
        _ => Error::auth(err),
    }
}
