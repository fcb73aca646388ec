//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ACCESS_BOT` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable
//! local configuration (mock ticketing, file approval store).
//!
//! # Example
//!
//! ```no_run
//! use access_request_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Lookup timeout: {:?}", config.lookup.timeout());
//! ```

mod approvals;
mod error;
mod interview;
mod logging;
mod lookup;
mod ticketing;

pub use approvals::ApprovalsConfig;
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use logging::LoggingConfig;
pub use lookup::LookupConfig;
pub use ticketing::TicketingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Timeouts for lookups made during the interview
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Ticketing backend and ticket template
    #[serde(default)]
    pub ticketing: TicketingConfig,

    /// Approval record store
    #[serde(default)]
    pub approvals: ApprovalsConfig,

    /// Interview feature flags and texts
    #[serde(default)]
    pub interview: InterviewConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ACCESS_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ACCESS_BOT__LOOKUP__TIMEOUT_SECS=10` -> `lookup.timeout_secs = 10`
    /// - `ACCESS_BOT__TICKETING__BASE_URL=...` -> `ticketing.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ACCESS_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.lookup.validate()?;
        self.ticketing.validate()?;
        self.approvals.validate()?;
        self.interview.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("ACCESS_BOT__LOOKUP__TIMEOUT_SECS");
        env::remove_var("ACCESS_BOT__TICKETING__SEVERITY");
        env::remove_var("ACCESS_BOT__TICKETING__BASE_URL");
        env::remove_var("ACCESS_BOT__TICKETING__API_TOKEN");
        env::remove_var("ACCESS_BOT__INTERVIEW__CONFIRM_APP_OWNERSHIP");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.lookup.timeout_secs, 30);
        assert!(!config.interview.confirm_app_ownership);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ACCESS_BOT__LOOKUP__TIMEOUT_SECS", "5");
        env::set_var("ACCESS_BOT__TICKETING__SEVERITY", "3");
        env::set_var("ACCESS_BOT__INTERVIEW__CONFIRM_APP_OWNERSHIP", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.lookup.timeout_secs, 5);
        assert_eq!(config.ticketing.severity, 3);
        assert!(config.interview.confirm_app_ownership);
    }

    #[test]
    fn test_backend_without_token_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ACCESS_BOT__TICKETING__BASE_URL", "https://tickets.example.com/api");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.ticketing.has_backend());
        assert!(config.validate().is_err());
    }
}
