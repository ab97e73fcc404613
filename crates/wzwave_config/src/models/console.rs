use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use super::logging::LoggingConfig;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct WZWaveConfig {
    pub controller: ControllerConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Serial device the Z-Wave stick is attached to.
    pub serial_port: String,
    /// Directory where the controller persists its node database.
    pub storage_dir: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            serial_port: "/dev/ttyACM0".to_string(),
            storage_dir: PathBuf::from("./storage"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub prompt: String,

    /// How long shutdown waits for the console loop to exit before aborting
    /// it. `null` waits forever.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Option<Duration>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            shutdown_timeout: Some(Duration::from_secs(5)),
        }
    }
}
