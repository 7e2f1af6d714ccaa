use crate::config::types::{Config, DownloadConfig, ExtractionConfig, FetchConfig};
use crate::ConfigError;
use regex::Regex;
use reqwest::header::HeaderValue;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_download_config(&config.download)?;
    validate_extraction_config(&config.extraction)?;
    Ok(())
}

/// Validates connection settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.connect_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "connect_timeout_ms must be >= 1".to_string(),
        ));
    }

    if config.read_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "read_timeout_ms must be >= 1".to_string(),
        ));
    }

    for (name, value) in [
        ("user_agent", &config.user_agent),
        ("accept", &config.accept),
        ("accept_language", &config.accept_language),
    ] {
        if HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} is not a valid header value: '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates naming and fan-out settings
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.max_filename_length < 1 || config.max_filename_length > 255 {
        return Err(ConfigError::Validation(format!(
            "max_filename_length must be between 1 and 255, got {}",
            config.max_filename_length
        )));
    }

    if config.random_name_length < 8 || config.random_name_length > 64 {
        return Err(ConfigError::Validation(format!(
            "random_name_length must be between 8 and 64, got {}",
            config.random_name_length
        )));
    }

    if config.max_concurrent_downloads > 256 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_downloads must be <= 256, got {}",
            config.max_concurrent_downloads
        )));
    }

    if config.known_extensions.is_empty() {
        return Err(ConfigError::Validation(
            "known_extensions cannot be empty".to_string(),
        ));
    }

    for extension in &config.known_extensions {
        validate_extension(extension)?;
    }

    Ok(())
}

/// An extension is a dot followed by one or more ASCII alphanumerics
fn validate_extension(extension: &str) -> Result<(), ConfigError> {
    let valid = extension
        .strip_prefix('.')
        .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(false);

    if !valid {
        return Err(ConfigError::Validation(format!(
            "Extension '{}' must be a dot followed by letters or digits",
            extension
        )));
    }

    Ok(())
}

/// Every pattern must compile
fn validate_extraction_config(config: &ExtractionConfig) -> Result<(), ConfigError> {
    if config.patterns.is_empty() {
        return Err(ConfigError::Validation(
            "at least one extraction pattern is required".to_string(),
        ));
    }

    for pattern in &config.patterns {
        Regex::new(&pattern.regex).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.regex.clone(),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}
