//! Configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::SignerConfig;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Validate a deserialized configuration.
///
/// # Errors
///
/// Returns the first [`ConfigError::Invalid`] found.
pub fn validate(config: &SignerConfig) -> ConfigResult<()> {
    validate_signing(config)?;
    validate_keys(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_signing(config: &SignerConfig) -> ConfigResult<()> {
    let signing = &config.signing;

    if signing.secret_env.trim().is_empty() {
        return Err(ConfigError::invalid("signing.secret_env", "must not be empty"));
    }
    if signing.extensions.is_empty() {
        return Err(ConfigError::invalid(
            "signing.extensions",
            "at least one extension is required",
        ));
    }
    for ext in &signing.extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "signing.extensions",
                format!("'{ext}' must be a bare extension such as \"zip\""),
            ));
        }
    }
    if signing.signatures_file.as_os_str().is_empty() {
        return Err(ConfigError::invalid("signing.signatures_file", "must not be empty"));
    }
    Ok(())
}

fn validate_keys(config: &SignerConfig) -> ConfigResult<()> {
    let keys = &config.keys;
    let names = [
        ("keys.private_key_file", &keys.private_key_file),
        ("keys.public_key_file", &keys.public_key_file),
        ("keys.guide_file", &keys.guide_file),
        ("keys.snippet_file", &keys.snippet_file),
    ];

    for (field, name) in names {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                field,
                format!("'{name}' must be a plain file name"),
            ));
        }
    }
    Ok(())
}

fn validate_logging(config: &SignerConfig) -> ConfigResult<()> {
    let logging = &config.logging;

    if !LEVELS.contains(&logging.level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::invalid(
            "logging.level",
            format!("unknown level '{}'; expected one of: {}", logging.level, LEVELS.join(", ")),
        ));
    }
    if !FORMATS.contains(&logging.format.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::invalid(
            "logging.format",
            format!("unknown format '{}'; expected one of: {}", logging.format, FORMATS.join(", ")),
        ));
    }
    Ok(())
}
