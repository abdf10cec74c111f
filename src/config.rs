//! Run configuration
//!
//! Values come from three layers, lowest precedence first: built-in defaults,
//! an optional `brickcheck.toml`, and command-line overrides.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the brick list
pub const DEFAULT_CATALOG_PATH: &str = "list/bricks.txt";

/// Default location of the failure log
pub const DEFAULT_FAILURE_LOG_PATH: &str = "fail/failures.txt";

/// Default repository tool used for asset lookups
pub const DEFAULT_TOOL: &str = "biobricks";

/// Default timeout for a single asset lookup (30 seconds)
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Config file picked up from the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "brickcheck.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("lookup_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Settings for one verification run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Brick list, one name per line
    pub catalog: PathBuf,
    /// Failure log, recreated on every run
    pub failure_log: PathBuf,
    /// Repository tool invoked as `<tool> assets <brick>`
    pub tool: String,
    /// Upper bound for one asset lookup
    pub lookup_timeout_secs: u64,
    /// Hand the resolved on-disk path to the generic size check instead of
    /// the raw asset reference
    pub generic_uses_resolved_path: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_PATH),
            failure_log: PathBuf::from(DEFAULT_FAILURE_LOG_PATH),
            tool: DEFAULT_TOOL.to_string(),
            lookup_timeout_secs: DEFAULT_LOOKUP_TIMEOUT.as_secs(),
            generic_uses_resolved_path: false,
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub catalog: Option<PathBuf>,
    pub failure_log: Option<PathBuf>,
    pub tool: Option<String>,
    pub lookup_timeout_secs: Option<u64>,
}

impl VerifyConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, `brickcheck.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(catalog) = overrides.catalog {
            self.catalog = catalog;
        }
        if let Some(failure_log) = overrides.failure_log {
            self.failure_log = failure_log;
        }
        if let Some(tool) = overrides.tool {
            self.tool = tool;
        }
        if let Some(secs) = overrides.lookup_timeout_secs {
            self.lookup_timeout_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lookup_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}
