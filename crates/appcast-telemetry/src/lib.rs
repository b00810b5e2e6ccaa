//! Appcast Telemetry - Logging for the appcast signing tools.
//!
//! # Example
//!
//! ```rust,no_run
//! use appcast_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), appcast_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("appcast_feed=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!(asset = "App-1.0.zip", "signed");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, build_subscriber, setup_logging};
