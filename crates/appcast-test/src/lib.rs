//! Appcast Test - Shared test utilities for the appcast signing tools.
//!
//! Mock signing backends and feed fixtures for use as a dev-dependency.
//!
//! ```rust,ignore
//! use appcast_test::{FailingBackend, SAMPLE_APPCAST};
//! use appcast_crypto::SignatureEngine;
//!
//! let engine = SignatureEngine::with_backend(Box::new(FailingBackend::new("boom")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
