//! The signature engine: one backend, chosen once, used uniformly.

use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::backend::{self, Purpose, SigningBackend};
use crate::encoding;
use crate::error::{CryptoError, CryptoResult};
use crate::keypair::{KeyPair, SecretKey};
#[cfg(feature = "native")]
use crate::keypair::PublicKey;
use crate::signature::Signature;

/// Ed25519 key generation and signing over a selected backend.
///
/// # Example
///
/// ```
/// use appcast_crypto::{NativeBackend, SignatureEngine};
///
/// let engine = SignatureEngine::with_backend(Box::new(NativeBackend));
/// let pair = engine.generate_keypair().unwrap();
///
/// let signature = engine.sign(b"App-1.0.zip bytes", pair.secret()).unwrap();
/// assert!(SignatureEngine::verify(pair.public(), b"App-1.0.zip bytes", &signature).is_ok());
/// ```
pub struct SignatureEngine {
    backend: Box<dyn SigningBackend>,
    fallback: Option<Box<dyn SigningBackend>>,
}

impl SignatureEngine {
    /// Probe for the best available backend for `purpose`.
    ///
    /// For key generation, an external tool that is present but fails is
    /// backed by the in-process implementation when it is compiled in.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::BackendUnavailable`] if no backend is present.
    pub fn select(purpose: Purpose) -> CryptoResult<Self> {
        let engine = Self::with_backend(backend::probe(purpose)?);
        if purpose != Purpose::KeyGeneration || engine.backend_name() == backend::NATIVE_BACKEND_NAME {
            return Ok(engine);
        }
        Ok(match backend::native_backend() {
            Some(native) => engine.with_fallback(native),
            None => engine,
        })
    }

    /// Use a specific backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn SigningBackend>) -> Self {
        Self {
            backend,
            fallback: None,
        }
    }

    /// Retry key generation on `fallback` when the primary backend fails.
    ///
    /// Signing never falls back.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Box<dyn SigningBackend>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Name of the selected backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Generate a fresh key pair.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if key generation fails.
    pub fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        self.generate_keypair_reporting().map(|(pair, _)| pair)
    }

    /// Generate a fresh key pair and report which backend produced it.
    ///
    /// # Errors
    ///
    /// Without a fallback, returns the backend's error. With one, returns
    /// [`CryptoError::BackendUnavailable`] naming both backends and why each
    /// failed.
    pub fn generate_keypair_reporting(&self) -> CryptoResult<(KeyPair, &'static str)> {
        let primary = match self.backend.generate_keypair() {
            Ok(pair) => return Ok(Self::generated(pair, self.backend.name())),
            Err(e) => e,
        };
        let Some(fallback) = &self.fallback else {
            return Err(primary);
        };

        warn!(
            backend = self.backend.name(),
            fallback = fallback.name(),
            error = %primary,
            "key generation failed, retrying with fallback backend"
        );
        match fallback.generate_keypair() {
            Ok(pair) => Ok(Self::generated(pair, fallback.name())),
            Err(secondary) => Err(CryptoError::BackendUnavailable {
                attempted: vec![
                    format!("{} ({primary})", self.backend.name()),
                    format!("{} ({secondary})", fallback.name()),
                ],
            }),
        }
    }

    fn generated(pair: KeyPair, backend: &'static str) -> (KeyPair, &'static str) {
        debug!(backend, key_id = %pair.public().key_id_hex(), "generated key pair");
        (pair, backend)
    }

    /// Sign the exact bytes of `message`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::SigningFailed`] (or `BackendUnavailable`)
    /// describing why the backend could not sign.
    pub fn sign(&self, message: &[u8], key: &SecretKey) -> CryptoResult<Signature> {
        self.backend
            .sign(message, key)
            .map_err(CryptoError::into_signing_failure)
    }

    /// Sign the contents of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::SigningFailed`] (or `BackendUnavailable`)
    /// if the file cannot be read or the backend fails.
    pub fn sign_file(&self, path: &Path, key: &SecretKey) -> CryptoResult<Signature> {
        self.backend
            .sign_file(path, key)
            .map_err(CryptoError::into_signing_failure)
    }

    /// Parse `secret` (base64, optionally PEM-wrapped) and sign `message`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::SigningFailed`] if the key cannot be
    /// parsed or the backend fails.
    pub fn sign_encoded(&self, message: &[u8], secret: &str) -> CryptoResult<Signature> {
        let key = SecretKey::parse(secret).map_err(CryptoError::into_signing_failure)?;
        self.sign(message, &key)
    }

    /// Verify `signature` over `message` against `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::SignatureVerificationFailed`] on mismatch.
    #[cfg(feature = "native")]
    pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> CryptoResult<()> {
        public_key.verify(message, signature)
    }

    /// Encode bytes as standard base64.
    #[must_use]
    pub fn encode(bytes: &[u8]) -> String {
        encoding::encode(bytes)
    }

    /// Decode standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CryptoError::InvalidBase64Encoding`] on malformed input.
    pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
        encoding::decode(text)
    }
}

impl fmt::Debug for SignatureEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureEngine")
            .field("backend", &self.backend.name())
            .field("fallback", &self.fallback.as_ref().map(|b| b.name()))
            .finish()
    }
}
