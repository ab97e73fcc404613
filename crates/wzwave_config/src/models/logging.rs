use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub use_color: bool,

    pub debug: bool,

    pub show_timestamp: bool,

    pub show_target: bool,

    /// Minimum level when `RUST_LOG` is unset, e.g. `warn` or `info`.
    pub min_level: String,
}

impl LoggingConfig {
    /// Filter directive derived from the config; `debug` wins over `min_level`.
    pub fn filter_directive(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.min_level.as_str()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            debug: false,
            show_timestamp: false,
            show_target: false,
            min_level: "warn".to_string(),
        }
    }
}
