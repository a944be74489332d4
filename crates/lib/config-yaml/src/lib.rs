//! Reads the relay's YAML config file.
//!
//! The document has a required `imap` section (server, credentials, watched
//! folder and IDLE tuning) and an optional `relay` section (event timezone):
//!
//! ```yaml
//! imap:
//!   host: imap.example.com
//!   username: relay@example.com
//!   password:
//!     env: IMAP_PASSWORD
//!   folder: Alerts
//! relay:
//!   timezone: Europe/Helsinki
//! ```
//!
//! Besides the YAML shape, values the relay cannot run with are rejected here
//! so a bad file fails at startup instead of inside the worker loop.

use std::path::{Path, PathBuf};

use config_core::Config;

/// A config file that could not be turned into a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read relay config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("relay config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Why a YAML document is not a usable relay config.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Not YAML, or not the `imap`/`relay` shape.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_bw::Error),

    /// Well-formed, but unusable.
    #[error(transparent)]
    Invalid(#[from] InvalidValue),
}

/// A field value the relay refuses to start with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidValue {
    #[error("imap.host is empty")]
    EmptyHost,

    #[error("imap.folder is empty")]
    EmptyFolder,

    /// A zero timeout would re-enter IDLE in a tight loop.
    #[error("imap.idle_timeout_secs must be positive")]
    ZeroIdleTimeout,
}

/// Read and parse the config file at `path`.
pub async fn load_from_path<P>(path: P) -> Result<Config, LoadError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let yaml = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;

    parse_str(&yaml).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })
}

/// Parse and check a config document held in memory.
pub fn parse_str(yaml: &str) -> Result<Config, ParseError> {
    let config: Config = serde_yaml_bw::from_str(yaml)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &Config) -> Result<(), InvalidValue> {
    let imap = &config.imap;
    if imap.host.trim().is_empty() {
        return Err(InvalidValue::EmptyHost);
    }
    if imap.folder.as_deref().is_some_and(|folder| folder.trim().is_empty()) {
        return Err(InvalidValue::EmptyFolder);
    }
    if imap.idle_timeout_secs == Some(0) {
        return Err(InvalidValue::ZeroIdleTimeout);
    }
    Ok(())
}
