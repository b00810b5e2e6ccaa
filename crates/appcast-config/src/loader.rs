//! Config file discovery and loading.
//!
//! Precedence, lowest first:
//! 1. Built-in defaults
//! 2. The config file: an explicit path, else `appcast-signer.toml` in the
//!    working directory if present
//! 3. `APPCAST_SIGNER_LOG` for the log level
//!
//! Command-line arguments are applied on top by the binaries.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::types::SignerConfig;
use crate::validate;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "appcast-signer.toml";

/// Environment variable overriding `logging.level`.
pub const LOG_ENV: &str = "APPCAST_SIGNER_LOG";

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: usize = 1_048_576;

/// Load the configuration from the process environment.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is unreadable or malformed, or the
/// result fails validation.
pub fn load(explicit: Option<&Path>, working_dir: &Path) -> ConfigResult<SignerConfig> {
    load_with_env(explicit, working_dir, |name| std::env::var(name).ok())
}

/// Load the configuration with a custom environment lookup.
///
/// An explicit path must exist; the working-directory file is optional.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env(
    explicit: Option<&Path>,
    working_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ConfigResult<SignerConfig> {
    let mut config = match explicit {
        Some(path) => {
            let content = read_config(path)?.ok_or_else(|| ConfigError::ReadError {
                path: path.display().to_string(),
                source: std::io::ErrorKind::NotFound.into(),
            })?;
            info!(path = %path.display(), "loaded config");
            parse(path, &content)?
        },
        None => {
            let path = working_dir.join(CONFIG_FILE_NAME);
            match read_config(&path)? {
                Some(content) => {
                    info!(path = %path.display(), "loaded config");
                    parse(&path, &content)?
                },
                None => SignerConfig::default(),
            }
        },
    };

    if let Some(level) = env(LOG_ENV).filter(|v| !v.trim().is_empty()) {
        debug!(var = LOG_ENV, level = %level, "log level overridden from environment");
        config.logging.level = level.trim().to_owned();
    }

    validate::validate(&config)?;
    Ok(config)
}

/// Parse a config document without touching the filesystem.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] or [`ConfigError::Invalid`].
pub fn from_toml(content: &str) -> ConfigResult<SignerConfig> {
    let config = parse(Path::new("<inline>"), content)?;
    validate::validate(&config)?;
    Ok(config)
}

fn parse(path: &Path, content: &str) -> ConfigResult<SignerConfig> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a file, returning `None` if it doesn't exist.
fn read_config(path: &Path) -> ConfigResult<Option<String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit",
                content.len()
            ),
        });
    }
    Ok(Some(content))
}
