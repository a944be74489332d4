//! Lift raw config into the runtime parameters of the relay.

use std::time::Duration;

use chrono_tz::Tz;

mod error;

pub use error::*;

/// Connection parameters and relay settings derived from one config.
#[derive(Debug, Clone)]
pub struct Bringup {
    /// Where to connect.
    pub params: imap_connect::Params,

    /// How the relay behaves.
    pub settings: mail_relay::Settings,
}

/// Resolve `config`, reading secrets and the `TZ` fallback from the
/// environment.
pub fn bringup(config: &config_core::Config) -> Result<Bringup, ConfigError> {
    let password = resolve_password(&config.imap.password).map_err(ConfigError::Password)?;

    let env_tz: Option<String> = envfury::maybe("TZ")
        .map_err(TimezoneError::Env)
        .map_err(ConfigError::Timezone)?;
    let timezone = resolve_timezone(config.relay.timezone.as_deref(), env_tz.as_deref())
        .map_err(ConfigError::Timezone)?;

    Ok(bringup_with(config, password, timezone))
}

/// Assemble the runtime values from already resolved secrets.
pub fn bringup_with(
    config: &config_core::Config,
    password: mail_relay::Password,
    timezone: Tz,
) -> Bringup {
    let imap = &config.imap;

    let params = imap_connect::Params {
        host: imap.host.clone(),
        port: imap.port.unwrap_or(imap_connect::DEFAULT_PORT),
        tls_server_name: imap
            .tls_server_name
            .clone()
            .unwrap_or_else(|| imap.host.clone()),
    };

    let mut settings = mail_relay::Settings::new(imap.username.clone(), password);
    settings.timezone = timezone;
    if let Some(folder) = &imap.folder {
        settings.folder.clone_from(folder);
    }
    if let Some(secs) = imap.idle_timeout_secs {
        settings.idle_timeout = Duration::from_secs(secs);
    }
    if let Some(skip_unread) = imap.skip_unread {
        settings.skip_unread = skip_unread;
    }

    Bringup { params, settings }
}

/// Resolve the password from config, including env var lookups.
pub fn resolve_password(
    source: &config_core::PasswordSource,
) -> Result<mail_relay::Password, PasswordError> {
    match source {
        config_core::PasswordSource::Plain(password) => {
            Ok(mail_relay::Password::new(password.clone()))
        }
        // Config supplies the name at runtime and `envfury` only takes
        // static keys.
        config_core::PasswordSource::Env { env } => match std::env::var(env) {
            Ok(value) => Ok(mail_relay::Password::new(value)),
            Err(std::env::VarError::NotPresent) => {
                Err(PasswordError::EnvMissing { name: env.clone() })
            }
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(PasswordError::NotUnicode { name: env.clone() })
            }
        },
    }
}

/// Pick the zone for event dates: the configured one, then `env_tz`, then UTC.
pub fn resolve_timezone(
    configured: Option<&str>,
    env_tz: Option<&str>,
) -> Result<Tz, TimezoneError> {
    let Some(name) = configured
        .or(env_tz)
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        tracing::debug!("no timezone configured, using UTC");
        return Ok(chrono_tz::UTC);
    };

    name.parse().map_err(|_| TimezoneError::Unknown {
        name: name.to_owned(),
    })
}
