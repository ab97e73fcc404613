use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::models::console::WZWaveConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub struct FileProvider;

impl FileProvider {
    /// Loads the configuration at `path` (or `config.yaml`). A missing file is
    /// an error.
    pub fn try_load_config(path: Option<&Path>) -> Result<WZWaveConfig, ConfigError> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_yaml(&content)
    }

    /// Like [`FileProvider::try_load_config`], but an explicit `path` is
    /// required to exist while a missing default file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<WZWaveConfig, ConfigError> {
        match Self::try_load_config(path) {
            Err(ConfigError::NotFound(missing)) if path.is_none() => {
                info!(
                    path = %missing.display(),
                    "No configuration file found, using defaults"
                );
                Ok(WZWaveConfig::default())
            }
            other => other,
        }
    }

    pub fn from_yaml(content: &str) -> Result<WZWaveConfig, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(WZWaveConfig::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
