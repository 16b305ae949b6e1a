// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{Result, SchedulerError};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. CLI arguments (highest, applied by the caller)
    /// 2. Environment variables (`APPOINTMENT_PARSER__SECTION__KEY`)
    /// 3. Config file
    /// 4. Defaults (lowest)
    ///
    /// The API key additionally falls back to `GEMINI_API_KEY`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_source = match config_path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("APPOINTMENT_PARSER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SchedulerError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| SchedulerError::Config(e.to_string()))?;

        app_config.apply_api_key_fallback(std::env::var(API_KEY_ENV).ok());
        Ok(app_config)
    }

    /// Use `fallback` as the API key unless a non-blank key is already configured.
    pub fn apply_api_key_fallback(&mut self, fallback: Option<String>) {
        let configured = self
            .gemini
            .api_key
            .as_ref()
            .is_some_and(|key| !key.is_empty());

        if !configured {
            self.gemini.api_key = fallback
                .filter(|value| !value.trim().is_empty())
                .map(ApiKey::new);
        }
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".appointment-parser")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
