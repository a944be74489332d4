//! Shared configuration types for mail-relay.

/// Root configuration.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The IMAP account to watch.
    pub imap: ImapConfig,

    /// Event shaping settings.
    #[cfg_attr(feature = "serde", serde(default))]
    pub relay: RelayConfig,
}

/// The watched IMAP account.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImapConfig {
    /// Hostname or IP address of the IMAP server.
    pub host: String,

    /// Optional port override.
    pub port: Option<u16>,

    /// Optional override for the TLS server name (SNI).
    pub tls_server_name: Option<String>,

    /// Username for IMAP authentication.
    pub username: String,

    /// Password for IMAP authentication.
    pub password: PasswordSource,

    /// Folder to watch (e.g. INBOX).
    pub folder: Option<String>,

    /// IDLE timeout override (seconds).
    pub idle_timeout_secs: Option<u64>,

    /// Whether to skip messages that are already unread at startup.
    pub skip_unread: Option<bool>,
}

/// Event shaping settings.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayConfig {
    /// IANA zone name the event `date` is rendered in.
    pub timezone: Option<String>,
}

/// Source for a password value.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum PasswordSource {
    /// Plaintext password stored directly in config.
    Plain(String),

    /// Name of an environment variable holding the password.
    Env {
        /// The variable name.
        env: String,
    },
}
