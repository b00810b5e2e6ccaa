//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during key generation, signing and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// No signing backend could be found.
    #[error("no signing backend available (tried: {})", attempted.join(", "))]
    BackendUnavailable {
        /// Backends that were probed, in order.
        attempted: Vec<String>,
    },

    /// Signing an asset failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// An external signing tool failed or produced unusable output.
    #[error("{tool} failed: {reason}")]
    ToolFailed {
        /// Tool name.
        tool: String,
        /// What went wrong.
        reason: String,
    },

    /// Key generation failed.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Invalid key length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Invalid signature length.
    #[error("invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Invalid public key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid base64 encoding.
    #[error("invalid base64 encoding")]
    InvalidBase64Encoding,

    /// Signature verification failed.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// I/O error (e.g. writing the transient key file).
    #[error("I/O error: {0}")]
    IoError(String),
}

impl CryptoError {
    /// Fold any error raised while signing into [`CryptoError::SigningFailed`].
    ///
    /// Callers that report per-asset failures only distinguish "signed" from
    /// "not signed"; the original cause is kept in the message.
    #[must_use]
    pub fn into_signing_failure(self) -> Self {
        match self {
            Self::SigningFailed(_) | Self::BackendUnavailable { .. } => self,
            other => Self::SigningFailed(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CryptoError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
