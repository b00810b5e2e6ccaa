//! Configuration for the appcast signing tools.
//!
//! ```rust,no_run
//! use appcast_config::{load, resolve_secret};
//!
//! let config = load(None, std::path::Path::new(".")).unwrap();
//! if resolve_secret(&config).is_none() {
//!     eprintln!("{} is not set", config.signing.secret_env);
//! }
//! ```
//!
//! This crate has no dependencies on the other appcast crates; the binaries
//! convert its plain values into domain types.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Secret resolution.
pub mod secret;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, LOG_ENV, from_toml, load, load_with_env};
pub use secret::{SecretString, resolve_secret, resolve_secret_with};
pub use types::*;
