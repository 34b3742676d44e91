//! Configuration management for msminer
//!
//! Settings load from environment variables with sensible defaults. Every
//! knob tunes one stage of the identification pipeline; the defaults
//! reproduce the reference classification rules exactly.
//!
//! # Environment Variables
//!
//! - `MSMINER_LOG_LEVEL`: Logging level - default: "info"
//! - `MSMINER_MIN_CONFIDENCE`: Weakest tier attempted (verified|unverified|image|name) - default: "name"
//! - `MSMINER_ACCEPT_UNVERIFIED`: Report explicit builds whose file is missing (true|false) - default: "false"
//! - `MSMINER_REQUIRE_CODE_COPY`: Only match build files that copy user code (true|false) - default: "false"
//! - `MSMINER_REQUIRE_DIR_KEYWORDS`: Only select manifests in keyword directories (true|false) - default: "true"
//! - `MSMINER_MAX_INCLUDE_DEPTH`: Maximum nesting of manifest includes/extends - default: "8"
//!
//! # Example
//!
//! ```no_run
//! use msminer::MinerConfig;
//!
//! let config = MinerConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::detection::types::Confidence;
use std::env;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_INCLUDE_DEPTH: usize = 8;
const MAX_INCLUDE_DEPTH_LIMIT: usize = 64;
const DEFAULT_ENV_FILE: &str = ".env";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Manifest Selector tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Reject manifests under directories that carry no recognized keyword
    pub require_dir_keywords: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            require_dir_keywords: true,
        }
    }
}

/// Service Collector tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Maximum nesting of `include` and external `extends` references
    pub max_include_depth: usize,
    /// Env file read next to each manifest when no explicit one is given
    pub env_file: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            env_file: DEFAULT_ENV_FILE.to_string(),
        }
    }
}

/// Build-file Locator tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Files at or below this size (bytes) are treated as empty placeholders
    pub empty_threshold: u64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self { empty_threshold: 1 }
    }
}

/// Container Classifier tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Weakest confidence tier that is attempted
    pub min_confidence: Confidence,
    /// Emit `BuildUnverified` microservices for explicit builds whose file is not in the pool
    pub accept_unverified: bool,
    /// Only build files that copy user code into the image can be matched
    pub require_code_copy: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_confidence: Confidence::BuildNameMatched,
            accept_unverified: false,
            require_code_copy: false,
        }
    }
}

/// Main configuration structure for msminer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerConfig {
    pub selector: SelectorConfig,
    pub collector: CollectorConfig,
    pub locator: LocatorConfig,
    pub classifier: ClassifierConfig,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for MinerConfig {
    /// Loads from `MSMINER_*` environment variables, falling back to
    /// [`MinerConfig::baseline`] for anything missing or unparsable.
    fn default() -> Self {
        let mut config = Self::baseline();

        if let Some(level) = env::var("MSMINER_LOG_LEVEL").ok() {
            config.log_level = level.to_lowercase();
        }

        if let Some(confidence) = env::var("MSMINER_MIN_CONFIDENCE")
            .ok()
            .and_then(|v| parse_confidence(&v).ok())
        {
            config.classifier.min_confidence = confidence;
        }

        if let Some(flag) = env_bool("MSMINER_ACCEPT_UNVERIFIED") {
            config.classifier.accept_unverified = flag;
        }

        if let Some(flag) = env_bool("MSMINER_REQUIRE_CODE_COPY") {
            config.classifier.require_code_copy = flag;
        }

        if let Some(flag) = env_bool("MSMINER_REQUIRE_DIR_KEYWORDS") {
            config.selector.require_dir_keywords = flag;
        }

        if let Some(depth) = env::var("MSMINER_MAX_INCLUDE_DEPTH")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            config.collector.max_include_depth = depth;
        }

        config
    }
}

impl MinerConfig {
    /// Built-in defaults, ignoring the environment
    pub fn baseline() -> Self {
        Self {
            selector: SelectorConfig::default(),
            collector: CollectorConfig::default(),
            locator: LocatorConfig::default(),
            classifier: ClassifierConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any validation fails
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collector.max_include_depth == 0 {
            return Err(ConfigError::ValidationFailed(
                "Max include depth must be at least 1".to_string(),
            ));
        }
        if self.collector.max_include_depth > MAX_INCLUDE_DEPTH_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max include depth cannot exceed {}",
                MAX_INCLUDE_DEPTH_LIMIT
            )));
        }

        if self.collector.env_file.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Env file name cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

/// Parses a confidence tier name as accepted by `MSMINER_MIN_CONFIDENCE` and the CLI
pub fn parse_confidence(value: &str) -> Result<Confidence, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "verified" | "build_verified" => Ok(Confidence::BuildVerified),
        "unverified" | "build_unverified" => Ok(Confidence::BuildUnverified),
        "image" | "build_image_matched" => Ok(Confidence::BuildImageMatched),
        "name" | "build_name_matched" => Ok(Confidence::BuildNameMatched),
        other => Err(ConfigError::ParseError {
            field: "min_confidence".to_string(),
            error: format!(
                "unknown tier '{}'. Valid options: verified, unverified, image, name",
                other
            ),
        }),
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|v| v.parse::<bool>().ok())
}
