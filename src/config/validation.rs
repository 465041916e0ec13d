//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MeditripError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_storage_config(&settings.storage)?;
    validate_navigation_config(&settings.navigation)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    if let Some(ref path) = settings.catalog.path {
        if path.trim().is_empty() {
            return Err(MeditripError::Config(
                "Catalog path must not be blank when set".to_string()
            ));
        }
    }

    Ok(())
}

/// Validate storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.dir.is_empty() {
        return Err(MeditripError::Config(
            "Storage directory is required".to_string()
        ));
    }

    if config.session_key.is_empty() {
        return Err(MeditripError::Config(
            "Session storage key is required".to_string()
        ));
    }

    if config.session_key.contains(['/', '\\']) {
        return Err(MeditripError::Config(
            format!("Session storage key must not contain path separators: {}", config.session_key)
        ));
    }

    if config.max_sessions == 0 {
        return Err(MeditripError::Config(
            "Max sessions must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate session titling configuration
fn validate_navigation_config(config: &super::NavigationConfig) -> Result<()> {
    if config.default_session_title.trim().is_empty() {
        return Err(MeditripError::Config(
            "Default session title is required".to_string()
        ));
    }

    if config.title_max_chars == 0 {
        return Err(MeditripError::Config(
            "Title length limit must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(MeditripError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(MeditripError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(MeditripError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(MeditripError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(MeditripError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
