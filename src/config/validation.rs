//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{StudioError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_backend_config(&settings.backend)?;
    validate_session_config(&settings.session)?;
    validate_composer_config(&settings.composer)?;
    validate_studio_config(&settings.studio)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(StudioError::Config(
            "Backend base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| StudioError::Config(format!("Invalid backend base URL {}: {}", config.base_url, e)))?;

    if config.timeout_seconds == 0 {
        return Err(StudioError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.token_path.trim().is_empty() {
        return Err(StudioError::Config(
            "Token path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate composer configuration
fn validate_composer_config(config: &super::ComposerConfig) -> Result<()> {
    if config.highlight_limit == 0 || config.story_limit == 0 {
        return Err(StudioError::Config(
            "Composer snippet limits must be greater than 0".to_string()
        ));
    }

    if config.fallback_title.trim().is_empty() {
        return Err(StudioError::Config(
            "Composer fallback title is required".to_string()
        ));
    }

    Ok(())
}

/// Validate studio display configuration
fn validate_studio_config(config: &super::StudioConfig) -> Result<()> {
    if config.organization_label.trim().is_empty() {
        return Err(StudioError::Config(
            "Organization label is required".to_string()
        ));
    }

    if config.unknown_group_label.trim().is_empty() {
        return Err(StudioError::Config(
            "Unknown group label is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(StudioError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(StudioError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_backend() {
        let mut settings = Settings::default();
        settings.backend.base_url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(StudioError::Config(_)));

        let mut settings = Settings::default();
        settings.backend.timeout_seconds = 0;
        assert_matches!(validate_settings(&settings), Err(StudioError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_snippet_limit() {
        let mut settings = Settings::default();
        settings.composer.story_limit = 0;
        assert_matches!(validate_settings(&settings), Err(StudioError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(StudioError::Config(_)));
    }
}
