//! Configuration module for the TVS client.
//!
//! Loads configuration from `tvs.toml` with environment variable overrides.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Remote tracking service configuration
#[derive(Clone, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API keys ordered by privilege tier, tier 0 first.
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

// Custom Debug implementation to avoid exposing keys
impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "keys",
                &self.keys.iter().map(|_| "[REDACTED]").collect::<Vec<_>>(),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            keys: Vec::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_endpoint() -> String {
    "https://www.tvs.example/api.php".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Progress reconciliation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. `tvs.toml` in current directory (optional)
    /// 3. Environment variables with `TVS_` prefix
    ///
    /// Environment variables use double underscore for nesting:
    /// - `TVS_TRACKER__ENDPOINT=https://...` sets `tracker.endpoint`
    /// - `TVS_TRACKER__KEYS=key0,key1` sets `tracker.keys`
    /// - `TVS_PROGRESS__LANGUAGE=de` sets `progress.language`
    pub fn load() -> Result<Self, AppError> {
        Self::load_from("tvs.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from(config_path: &str) -> Result<Self, AppError> {
        let config = ConfigLoader::builder()
            // Start with defaults
            .set_default("tracker.endpoint", default_endpoint())?
            .set_default("tracker.timeout_secs", default_timeout_secs() as i64)?
            .set_default("progress.language", default_language())?
            // Add config file (optional)
            .add_source(File::with_name(config_path).required(false))
            // Override with environment variables
            // TVS_TRACKER__KEYS=key0,key1 -> tracker.keys = ["key0", "key1"]
            .add_source(
                Environment::with_prefix("TVS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("tracker.keys")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration for required fields.
    fn validate(&self) -> Result<(), AppError> {
        if self.tracker.endpoint.trim().is_empty() {
            return Err(AppError::Configuration(
                "tracker endpoint cannot be empty".to_string(),
            ));
        }

        if self.tracker.keys.is_empty() {
            tracing::warn!("No tracker API keys configured - every remote call will fail");
        }

        if self.progress.language.trim().is_empty() {
            return Err(AppError::Configuration(
                "progress language cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
