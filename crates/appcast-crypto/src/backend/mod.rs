//! Signing backends and runtime backend selection.
//!
//! Two interchangeable implementations sit behind [`SigningBackend`]:
//!
//! - [`SparkleTools`]: the official `generate_keys` / `sign_update` binaries,
//!   found on `PATH`. Preferred whenever present.
//! - [`NativeBackend`]: in-process Ed25519 via `ed25519-dalek` (feature
//!   `native`, enabled by default).
//!
//! [`probe`] picks one at startup; callers never branch on availability again.

#[cfg(feature = "native")]
pub(crate) mod native;
mod sparkle;

#[cfg(feature = "native")]
pub use native::NativeBackend;
pub use sparkle::{GENERATE_KEYS, SIGN_UPDATE, SparkleTools, parse_sign_update_output};

use std::path::Path;

use tracing::debug;

use crate::error::{CryptoError, CryptoResult};
use crate::keypair::{KeyPair, SecretKey};
use crate::signature::Signature;

/// Name reported for the in-process backend.
pub const NATIVE_BACKEND_NAME: &str = "native ed25519";

/// What the selected backend will be used for.
///
/// The Sparkle tools ship as separate binaries, so availability depends on
/// the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Creating a new signing identity.
    KeyGeneration,
    /// Signing release artifacts.
    Signing,
}

/// A provider of Ed25519 key generation and signing.
pub trait SigningBackend: Send + Sync {
    /// Human-readable backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Generate a fresh key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a key pair.
    fn generate_keypair(&self) -> CryptoResult<KeyPair>;

    /// Sign the exact bytes of `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    fn sign(&self, message: &[u8], key: &SecretKey) -> CryptoResult<Signature>;

    /// Sign the contents of the file at `path`.
    ///
    /// Reads the whole file and calls [`sign`](Self::sign) by default.
    /// Backends that can sign a file in place override this.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or signing fails.
    fn sign_file(&self, path: &Path, key: &SecretKey) -> CryptoResult<Signature> {
        let bytes = std::fs::read(path)?;
        self.sign(&bytes, key)
    }
}

/// Probe for a backend able to serve `purpose`.
///
/// The Sparkle tools are tried first, then the in-process implementation.
///
/// # Errors
///
/// Returns [`CryptoError::BackendUnavailable`] listing every backend tried
/// when none is present.
pub fn probe(purpose: Purpose) -> CryptoResult<Box<dyn SigningBackend>> {
    let mut attempted = Vec::with_capacity(2);

    attempted.push(format!("Sparkle `{}`", SparkleTools::tool_for(purpose)));
    if let Some(tools) = SparkleTools::locate(purpose) {
        debug!(?purpose, backend = tools.name(), "selected external signing tools");
        return Ok(Box::new(tools));
    }

    attempted.push(NATIVE_BACKEND_NAME.to_string());
    if let Some(backend) = native_backend() {
        debug!(?purpose, backend = backend.name(), "falling back to in-process signing");
        return Ok(backend);
    }

    Err(CryptoError::BackendUnavailable { attempted })
}

#[cfg(feature = "native")]
pub(crate) fn native_backend() -> Option<Box<dyn SigningBackend>> {
    Some(Box::new(NativeBackend))
}

#[cfg(not(feature = "native"))]
pub(crate) fn native_backend() -> Option<Box<dyn SigningBackend>> {
    None
}
