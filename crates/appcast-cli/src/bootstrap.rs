//! Shared start-up for the binaries: configuration, then logging.

use std::path::Path;

use anyhow::Context;
use appcast_config::SignerConfig;
use appcast_telemetry::{LogConfig, LogFormat, setup_logging};

/// Load the configuration and install the global subscriber.
///
/// `verbose` forces the `debug` level. Logging is set up even when the
/// configuration is rejected, so the error that follows is still logged.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub fn init(config_path: Option<&Path>, verbose: bool) -> anyhow::Result<SignerConfig> {
    let working_dir = std::env::current_dir().context("cannot determine the working directory")?;
    let loaded = appcast_config::load(config_path, &working_dir);

    let mut log_config = match &loaded {
        Ok(config) => LogConfig::from_section(&config.logging).unwrap_or_default(),
        Err(_) => LogConfig::new("warn").with_format(LogFormat::Compact),
    };
    if verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    loaded.context("failed to load configuration")
}
