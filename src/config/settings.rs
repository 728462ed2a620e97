//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use crate::models::Role;

/// Name of the optional configuration file (extension resolved by `config`)
pub const CONFIG_FILE: &str = "newsletter-studio";

/// Prefix of environment variable overrides, e.g. `NEWSLETTER_STUDIO_BACKEND__BASE_URL`
pub const ENV_PREFIX: &str = "NEWSLETTER_STUDIO";

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub composer: ComposerConfig,
    pub studio: StudioConfig,
    pub logging: LoggingConfig,
}

/// Newsletter backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

/// Client-side session persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub token_path: String,
}

/// Output flavor of the draft composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftFormat {
    Html,
    PlainText,
}

/// Draft composer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComposerConfig {
    pub format: DraftFormat,
    pub highlight_limit: usize,
    pub story_limit: usize,
    pub fallback_title: String,
}

/// Studio display configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StudioConfig {
    pub organization_label: String,
    pub unknown_group_label: String,
    pub default_role: Role,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from defaults, the configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::StudioError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://localhost:8000".to_string(),
                timeout_seconds: 15,
                user_agent: "NewsletterStudio/0.1".to_string(),
            },
            session: SessionConfig {
                token_path: ".newsletter_token".to_string(),
            },
            composer: ComposerConfig {
                format: DraftFormat::Html,
                highlight_limit: 260,
                story_limit: 220,
                fallback_title: "Internal newsletter".to_string(),
            },
            studio: StudioConfig {
                organization_label: "Whole organization".to_string(),
                unknown_group_label: "Unknown group".to_string(),
                default_role: Role::User,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
