//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::infrastructure::cache::DEFAULT_MAX_MESSAGE_COUNT;

/// Root configuration structure containing all settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// State cache configuration
    pub cache: CacheSettings,

    /// Logging configuration
    pub log: LogSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// State cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Messages retained per channel (default: 50, 0 disables history)
    pub max_message_count: usize,

    /// Number of shard stores created up front
    pub shard_count: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_message_count: DEFAULT_MAX_MESSAGE_COUNT,
            shard_count: 1,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if no shard is configured.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__CACHE__MAX_MESSAGE_COUNT=100 -> cache.max_message_count = 100
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option(
                "cache.shard_count",
                std::env::var("SHARD_COUNT").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Settings built from the defaults alone.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("development")?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("cache.max_message_count", DEFAULT_MAX_MESSAGE_COUNT as i64)?
            .set_default("cache.shard_count", 1)?
            .set_default("log.filter", "info,gateway_state=debug")?
            .set_default("log.json", false)
    }

    fn validate(settings: Self) -> Result<Self, ConfigError> {
        if settings.cache.shard_count == 0 {
            return Err(ConfigError::Message(
                "cache.shard_count must be at least 1".to_string(),
            ));
        }
        Ok(settings)
    }
}
