pub mod error;
pub mod models;
pub mod provider;

pub use error::ConfigError;
pub use models::console::{ConsoleConfig, ControllerConfig, WZWaveConfig};
pub use models::logging::LoggingConfig;
pub use provider::file::FileProvider;
