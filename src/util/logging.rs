//! Structured logging setup for msminer
//!
//! Logs go to stderr so that report output on stdout stays machine-readable.
//! `RUST_LOG` is honoured; otherwise the crate logs at the configured level.
//!
//! # Example
//!
//! ```no_run
//! use msminer::util::logging;
//!
//! logging::init_from_env();
//! tracing::info!(repo = "shop", "Mining repository");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// How the global subscriber is built
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for msminer's own events
    pub level: Level,

    /// Emit one JSON object per event
    pub use_json: bool,

    /// Include the module path of each event
    pub include_target: bool,

    /// Include file and line of each event
    pub include_location: bool,

    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON lines with full metadata, for long mining runs whose logs are collected
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }

    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            include_target: true,
            ..Default::default()
        }
    }

    /// Reads `MSMINER_LOG_LEVEL` and `MSMINER_LOG_JSON`
    pub fn from_env() -> Self {
        let level = env::var("MSMINER_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO);
        let use_json = env::var("MSMINER_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            ..Default::default()
        }
    }

    fn filter(&self) -> EnvFilter {
        if env::var("RUST_LOG").is_ok() {
            return EnvFilter::from_default_env();
        }
        let directive = format!("msminer={}", self.level);
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("msminer=info"))
    }
}

/// Parses a level name, case-insensitively; unknown names fall back to INFO
pub fn parse_level(level_str: &str) -> Level {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Installs the global subscriber; only the first call has any effect
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids);

        let registry = tracing_subscriber::registry().with(config.filter());
        let result = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

pub fn init_from_env() {
    init_logging(LoggingConfig::from_env());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("Debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARNING "), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_presets() {
        let default = LoggingConfig::default();
        assert_eq!(default.level, Level::INFO);
        assert!(!default.use_json);

        let production = LoggingConfig::production();
        assert!(production.use_json);
        assert!(production.include_location);

        let development = LoggingConfig::development();
        assert_eq!(development.level, Level::DEBUG);
        assert!(development.include_target);
        assert!(!development.use_json);

        assert_eq!(LoggingConfig::with_level(Level::WARN).level, Level::WARN);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("MSMINER_LOG_LEVEL", "debug");
        env::set_var("MSMINER_LOG_JSON", "true");
        let config = LoggingConfig::from_env();
        env::remove_var("MSMINER_LOG_LEVEL");
        env::remove_var("MSMINER_LOG_JSON");

        assert_eq!(config.level, Level::DEBUG);
        assert!(config.use_json);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("MSMINER_LOG_LEVEL");
        env::remove_var("MSMINER_LOG_JSON");
        let config = LoggingConfig::from_env();
        assert_eq!(config.level, Level::INFO);
        assert!(!config.use_json);
    }
}
