//! Configuration loading orchestration for mail-relay.

use std::path::PathBuf;

use config_core::Config;

/// Environment variable overriding the configuration file path.
pub const ENV_VAR: &str = "MAIL_RELAY_CONFIG";

/// Errors returned while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The override env var could not be read.
    #[error("config path env var read: {0}")]
    Env(#[source] envfury::Error<envfury::ValueError<<PathBuf as std::str::FromStr>::Err>>),

    /// None of the candidate paths exist.
    #[error("no config file found in paths: {paths:?}")]
    NotFound {
        /// The paths that were tried.
        paths: Vec<PathBuf>,
    },

    /// Checking a candidate path failed.
    #[error("failed to check config file {path}: {source}")]
    Lookup {
        /// The candidate path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The chosen file could not be loaded.
    #[error(transparent)]
    Yaml(#[from] config_yaml::LoadError),
}

/// Load the configuration from the path in [`ENV_VAR`], or from the first
/// existing default path.
pub async fn with_default_env_var() -> Result<Config, LoadError> {
    let override_path = envfury::maybe(ENV_VAR).map_err(LoadError::Env)?;
    with(override_path).await
}

/// Load the configuration from `override_path`, or from the first existing
/// default path.
pub async fn with(override_path: Option<PathBuf>) -> Result<Config, LoadError> {
    let paths: Vec<PathBuf> = config_paths::resolve(override_path).collect();
    let path = locate(&paths).await?;
    tracing::info!(path = %path.display(), "loading config");
    Ok(config_yaml::load_from_path(&path).await?)
}

/// The first of `paths` that exists.
async fn locate(paths: &[PathBuf]) -> Result<PathBuf, LoadError> {
    for path in paths {
        match tokio::fs::try_exists(path).await {
            Ok(true) => return Ok(path.clone()),
            Ok(false) => tracing::debug!(path = %path.display(), "config file absent"),
            Err(source) => {
                return Err(LoadError::Lookup {
                    path: path.clone(),
                    source,
                });
            }
        }
    }

    Err(LoadError::NotFound {
        paths: paths.to_vec(),
    })
}
