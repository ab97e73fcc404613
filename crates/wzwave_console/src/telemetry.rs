//! Logging setup.
//!
//! Logs go to stderr so they never mix into a line the console is drawing on
//! stdout. `RUST_LOG` takes precedence over the configured level.

use std::io;

use atty::Stream;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use wzwave_config::LoggingConfig;

use crate::error::ConsoleError;

pub fn init_logging(config: &LoggingConfig) -> Result<(), ConsoleError> {
    let filter = build_filter(config)?;
    let use_ansi = config.use_color && atty::is(Stream::Stderr);

    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(use_ansi)
        .with_target(config.show_target);

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.show_timestamp {
        registry.with(layer).try_init()
    } else {
        registry.with(layer.without_time()).try_init()
    };

    result.map_err(|e| ConsoleError::Logging(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConsoleError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.filter_directive())
        .map_err(|e| ConsoleError::Logging(format!("invalid log level: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_accepted() {
        let config = LoggingConfig {
            min_level: "info".to_string(),
            ..Default::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
