//! Runtime configuration from environment variables.
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the process environment win.

use crate::logging::{default_log_level, normalize_level};
use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::num::NonZeroU32;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "REGISTRY_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "REGISTRY_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "REGISTRY_LOG_DIR";
pub const PAGE_LIMIT_VAR: &str = "REGISTRY_PAGE_LIMIT";

const DEFAULT_DB_PATH: &str = "student_registry.sqlite3";
const DEFAULT_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(String),
    InvalidPageLimit(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_VAR}: {message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_VAR} must be an absolute path, got `{value}`")
            }
            Self::InvalidPageLimit(value) => {
                write!(f, "{PAGE_LIMIT_VAR} must be a positive integer, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for the registry core and its command-line surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Log directory; file logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Page size used when a caller does not pass one.
    pub page_limit: NonZeroU32,
}

impl RegistryConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_PATH_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(value) => normalize_level(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match lookup(LOG_DIR_VAR).filter(|value| !value.trim().is_empty()) {
            Some(value) => {
                let path = PathBuf::from(value.trim());
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(value));
                }
                Some(path)
            }
            None => None,
        };

        let page_limit = match lookup(PAGE_LIMIT_VAR) {
            Some(value) => value
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ConfigError::InvalidPageLimit(value))?,
            None => NonZeroU32::new(DEFAULT_PAGE_LIMIT).unwrap_or(NonZeroU32::MIN),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            page_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RegistryConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = RegistryConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from("student_registry.sqlite3"));
        assert_eq!(config.page_limit.get(), 100);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn values_are_read_and_normalized() {
        let config = RegistryConfig::from_lookup(lookup_from(&[
            ("REGISTRY_DB_PATH", "/tmp/registry.db"),
            ("REGISTRY_LOG_LEVEL", "WARNING"),
            ("REGISTRY_PAGE_LIMIT", " 25 "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/registry.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.page_limit.get(), 25);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let zero_limit =
            RegistryConfig::from_lookup(lookup_from(&[("REGISTRY_PAGE_LIMIT", "0")]));
        assert_eq!(
            zero_limit,
            Err(ConfigError::InvalidPageLimit("0".to_string()))
        );

        let relative_dir =
            RegistryConfig::from_lookup(lookup_from(&[("REGISTRY_LOG_DIR", "logs")]));
        assert!(matches!(relative_dir, Err(ConfigError::RelativeLogDir(_))));

        let bad_level =
            RegistryConfig::from_lookup(lookup_from(&[("REGISTRY_LOG_LEVEL", "loud")]));
        assert!(matches!(bad_level, Err(ConfigError::InvalidLogLevel(_))));
    }
}
