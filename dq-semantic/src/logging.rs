//! Logging utilities and configuration for dq-semantic.
//!
//! Recognizers run once per value of a column, so per-value logging is gated
//! behind [`LogConfig`] switches and the macros below.

use tracing::Level;

/// Logging configuration for recognition runs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for dq-semantic components
    pub base_level: Level,
    /// Whether to log individual dictionary/regex lookups
    pub log_lookup_details: bool,
    /// Whether to log cache hits, misses and evictions
    pub log_cache_operations: bool,
    /// Maximum length for logged values (to keep raw data out of logs)
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_lookup_details: false,
            log_cache_operations: false,
            max_field_length: 64,
        }
    }
}

impl LogConfig {
    /// Creates a verbose configuration suitable for debugging.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_lookup_details: true,
            log_cache_operations: true,
            max_field_length: 256,
        }
    }

    /// Creates a minimal configuration for production with lowest overhead.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_lookup_details: false,
            log_cache_operations: false,
            max_field_length: 32,
        }
    }
}

/// Macro for conditional lookup logging.
#[macro_export]
macro_rules! log_lookup {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_lookup_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Macro for conditional cache logging.
#[macro_export]
macro_rules! log_cache_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_cache_operations {
            tracing::trace!($($arg)*);
        }
    };
}

/// Truncates a value to the maximum field length if needed.
///
/// Truncation respects character boundaries.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Utilities for setting up structured logging.
pub mod setup {
    use tracing::Level;

    /// Configuration for the global subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for the application
        pub level: Level,
        /// Log level for dq-semantic components specifically
        pub crate_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Creates a configuration for production use.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                crate_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Creates a configuration for development use.
        pub fn development() -> Self {
            Self {
                level: Level::DEBUG,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// Sets the log level for the application.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the log level for dq-semantic components.
        pub fn with_crate_level(mut self, level: Level) -> Self {
            self.crate_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            if let Some(ref filter) = self.env_filter {
                filter.clone()
            } else {
                format!(
                    "{},dq_semantic={}",
                    self.level.as_str().to_lowercase(),
                    self.crate_level.as_str().to_lowercase()
                )
            }
        }
    }

    /// Initializes the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use dq_semantic::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer().json().boxed()
        } else {
            tracing_subscriber::fmt::layer().boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::setup::LoggingConfig;
    use super::*;

    #[test]
    fn test_log_config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.base_level, Level::INFO);
        assert!(!config.log_lookup_details);
        assert!(!config.log_cache_operations);
        assert_eq!(config.max_field_length, 64);
    }

    #[test]
    fn test_log_config_verbose() {
        let config = LogConfig::verbose();
        assert_eq!(config.base_level, Level::DEBUG);
        assert!(config.log_lookup_details);
        assert!(config.log_cache_operations);
    }

    #[test]
    fn test_truncate_field() {
        assert_eq!(truncate_field("hello", 10), "hello");
        assert_eq!(
            truncate_field("this is a very long value", 10),
            "this is a ...(truncated)"
        );
    }

    #[test]
    fn test_truncate_field_char_boundary() {
        // 'é' is two bytes; cutting at byte 2 would split it
        assert_eq!(truncate_field("aéb", 2), "a...(truncated)");
    }

    #[test]
    fn test_env_filter_string() {
        let config = LoggingConfig::production();
        assert_eq!(config.env_filter(), "warn,dq_semantic=info");

        let config = LoggingConfig::default().with_env_filter("dq_semantic=trace");
        assert_eq!(config.env_filter(), "dq_semantic=trace");
    }
}
