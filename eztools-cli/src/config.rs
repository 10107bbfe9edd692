//! `eztools.toml` application settings.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "eztools.db"
//!
//! [logging]
//! level = "info"
//! file = "eztools.log"
//!
//! [tax]
//! config_file = "tax_config.toml"
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use eztools_core::db::DbConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// A bare level or any `EnvFilter` directive. When unset, `RUST_LOG`
    /// or the built-in default applies.
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    /// TOML rate table used instead of the stored or built-in one.
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LoggingConfig,
    pub tax: TaxSettings,
    /// Directory of the file this was loaded from. Relative paths in the
    /// file are resolved against it.
    #[serde(skip)]
    source_dir: Option<PathBuf>,
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "eztools.toml";

    /// Parses `text`; `path` is only used in error messages.
    pub fn from_toml(
        text: &str,
        path: &Path,
    ) -> Result<Self, AppConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| AppConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        let text = fs::read_to_string(path).map_err(|source| AppConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text, path)?;
        config.source_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Loads `path` when given. Otherwise loads [`Self::DEFAULT_PATH`] if it
    /// exists and falls back to defaults if it does not.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AppConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(Self::DEFAULT_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The log filter to apply over `RUST_LOG`: the command-line `flag`,
    /// then `[logging] level`. `None` leaves the startup filter alone.
    pub fn log_level<'a>(
        &'a self,
        flag: Option<&'a str>,
    ) -> Option<&'a str> {
        flag.or(self.logging.level.as_deref())
    }

    /// `[tax] config_file`, relative to the directory of this config file.
    pub fn tax_config_file(&self) -> Option<PathBuf> {
        let file = self.tax.config_file.as_ref()?;
        Some(match &self.source_dir {
            Some(dir) => dir.join(file),
            None => file.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), AppConfigError> {
        match &self.logging.level {
            Some(level) => EnvFilter::try_new(level)
                .map(|_| ())
                .map_err(|_| AppConfigError::InvalidLogLevel(level.clone())),
            None => Ok(()),
        }
    }
}
