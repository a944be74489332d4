//! Error types.

/// Config bringup error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to resolve the password.
    #[error("password: {0}")]
    Password(#[source] PasswordError),

    /// Failed to resolve the timezone.
    #[error("timezone: {0}")]
    Timezone(#[source] TimezoneError),
}

/// Errors returned while resolving the password.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// The env var is not set.
    #[error("env var {name} is not set")]
    EnvMissing {
        /// The variable name.
        name: String,
    },

    /// The env var holds bytes that are not valid Unicode.
    #[error("env var {name} is not valid unicode")]
    NotUnicode {
        /// The variable name.
        name: String,
    },
}

/// Errors returned while resolving the timezone.
#[derive(Debug, thiserror::Error)]
pub enum TimezoneError {
    /// The `TZ` env var could not be read.
    #[error("TZ env var: {0}")]
    Env(#[source] envfury::Error<envfury::ValueError<std::convert::Infallible>>),

    /// The zone name is not in the IANA database.
    #[error("unknown zone \"{name}\"")]
    Unknown {
        /// The rejected name.
        name: String,
    },
}
