//! Default configuration file paths for mail-relay.

use std::path::PathBuf;

use either::Either;

/// System-wide configuration file.
pub const SYSTEM_PATH: &str = "/etc/mail-relay/config.yaml";

/// Default configuration file paths, most specific first: the user config
/// directory, then the home directory, then the system-wide file.
pub fn defaults() -> impl Iterator<Item = PathBuf> {
    let config_dir = dirs::config_dir()
        .into_iter()
        .map(|dir| dir.join("mail-relay").join("config.yaml"));
    let home_dir = dirs::home_dir()
        .into_iter()
        .map(|dir| dir.join(".mail-relay.yaml"));
    let system = std::iter::once_with(|| PathBuf::from(SYSTEM_PATH));

    config_dir.chain(home_dir).chain(system)
}

/// Only `override_path` when given, the [`defaults`] otherwise.
pub fn resolve(override_path: Option<PathBuf>) -> impl Iterator<Item = PathBuf> {
    match override_path {
        Some(path) => Either::Left(std::iter::once(path)),
        None => Either::Right(defaults()),
    }
}
