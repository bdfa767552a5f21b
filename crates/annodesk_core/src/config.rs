//! Host configuration providers.
//!
//! # Responsibility
//! - Model the host `get_config` round trip as a trait.
//! - Provide env, JSON file and static implementations.
//!
//! # Invariants
//! - A returned `AppConfig` always carries a non-blank `db_url`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable read by [`EnvConfigProvider`].
pub const DB_URL_ENV: &str = "ANNODESK_DB_URL";

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration the data access module needs from its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine connection string, e.g. `sqlite:annotations.db`.
    pub db_url: String,
}

impl AppConfig {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            db_url: db_url.into(),
        }
    }

    fn checked(self) -> ConfigResult<Self> {
        if self.db_url.trim().is_empty() {
            return Err(ConfigError::EmptyDbUrl);
        }
        Ok(self)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    MissingEnv(&'static str),
    EmptyDbUrl,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnv(name) => write!(f, "environment variable `{name}` is not set"),
            Self::EmptyDbUrl => write!(f, "configuration returned an empty db_url"),
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::MissingEnv(_) | Self::EmptyDbUrl => None,
        }
    }
}

/// Request/response source of application configuration.
pub trait ConfigProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig>;
}

/// Fixed configuration, for embedding hosts and tests.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    config: AppConfig,
}

impl StaticConfigProvider {
    pub fn new(db_url: impl Into<String>) -> Self {
        Self {
            config: AppConfig::new(db_url),
        }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig> {
        self.config.clone().checked()
    }
}

/// Reads `db_url` from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvConfigProvider {
    var: &'static str,
}

impl EnvConfigProvider {
    /// Provider for a custom variable name.
    pub fn with_var(var: &'static str) -> Self {
        Self { var }
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::with_var(DB_URL_ENV)
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig> {
        match std::env::var(self.var) {
            Ok(value) if !value.trim().is_empty() => AppConfig::new(value.trim()).checked(),
            _ => Err(ConfigError::MissingEnv(self.var)),
        }
    }
}

/// Reads `{"db_url": "..."}` from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileConfigProvider {
    path: PathBuf,
}

impl JsonFileConfigProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigProvider for JsonFileConfigProvider {
    fn fetch_config(&self) -> ConfigResult<AppConfig> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        config.checked()
    }
}
