//! Relay settings.

use std::time::Duration;

use crate::Password;

/// Folder watched when none is configured.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// How long a single IDLE wait lasts before it is refreshed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Wait after a failed session before reconnecting.
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Pause between two sessions, on top of [`RETRY_DELAY`].
pub const LOOP_PAUSE: Duration = Duration::from_secs(1);

/// Resolved settings for the relay worker.
#[derive(Debug, Clone)]
pub struct Settings {
    /// IMAP login name.
    pub username: String,

    /// IMAP password.
    pub password: Password,

    /// Folder to watch.
    pub folder: String,

    /// Length of a single IDLE wait.
    pub idle_timeout: Duration,

    /// Mark the backlog seen on the first login without publishing it.
    pub skip_unread: bool,

    /// Zone the `date` field of published events is rendered in.
    pub timezone: chrono_tz::Tz,
}

impl Settings {
    /// Settings with the default folder and IDLE timeout, skipping the backlog
    /// and rendering dates in UTC.
    pub fn new(username: impl Into<String>, password: Password) -> Self {
        Self {
            username: username.into(),
            password,
            folder: DEFAULT_FOLDER.to_owned(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            skip_unread: true,
            timezone: chrono_tz::UTC,
        }
    }
}
