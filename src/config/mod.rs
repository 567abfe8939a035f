//! Crate configuration.
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `TXWRAP` prefix
//! and `__` as the nesting separator:
//!
//! - `TXWRAP__CONTEXT_MODE=per_context` -> `context_mode = PerContext`
//! - `TXWRAP__LOG_LEVEL=txwrap=debug` -> tracing filter directive
//!
//! # Example
//!
//! ```no_run
//! use txwrap::config::TxConfig;
//!
//! let config = TxConfig::load().expect("failed to load configuration");
//! txwrap::config::init_tracing(&config).ok();
//! ```

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::domain::foundation::ContextMode;

fn default_log_level() -> String {
    "info".to_string()
}

/// Root configuration for engines and proxies built on this crate.
#[derive(Debug, Clone, Deserialize)]
pub struct TxConfig {
    /// How execution-context ids are resolved. Defaults to `shared`:
    /// every caller shares one session and one logical transaction.
    #[serde(default)]
    pub context_mode: ContextMode,

    /// Tracing filter directive for [`init_tracing`].
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            context_mode: ContextMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl TxConfig {
    /// Loads configuration from environment variables.
    ///
    /// Reads a `.env` file if present, then `TXWRAP`-prefixed variables.
    /// Every field has a default, so an empty environment is valid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a value cannot be parsed into its typed
    /// field.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().prefix("TXWRAP").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates configuration values that the type system cannot check.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLogFilter` when `log_level` is not a
    /// valid tracing filter directive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level
            .parse::<EnvFilter>()
            .map_err(|_| ConfigError::InvalidLogFilter(self.log_level.clone()))?;
        Ok(())
    }
}

/// Initializes the global tracing subscriber from `config.log_level`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidLogFilter` for an unparsable directive.
/// Calling this twice is harmless; the second subscriber is discarded.
pub fn init_tracing(config: &TxConfig) -> Result<(), ConfigError> {
    let filter = config
        .log_level
        .parse::<EnvFilter>()
        .map_err(|_| ConfigError::InvalidLogFilter(config.log_level.clone()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
    Ok(())
}
