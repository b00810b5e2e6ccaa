//! Release tooling for Sparkle appcasts.
//!
//! The library holds the flows behind the binaries:
//! - `appcast-keygen`: [`keygen::generate_keys`]
//! - `appcast-sign`: [`assets::sign_assets`]
//! - `appcast-verify`: `verify::verify_assets` (needs the `native` feature)
//!
//! Each flow takes its inputs explicitly. Only the binaries read the
//! environment.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod assets;
pub mod bootstrap;
pub mod error;
pub mod instructions;
pub mod keygen;
pub mod theme;
#[cfg(feature = "native")]
pub mod verify;

pub use error::{CliError, CliResult};
