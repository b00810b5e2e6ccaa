//! Ed25519 signatures over release artifacts.

use std::fmt;

use crate::encoding;
use crate::error::{CryptoError, CryptoResult};
#[cfg(feature = "native")]
use crate::keypair::PublicKey;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignatureLength`] if the slice is not exactly 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        if slice.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_LENGTH,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Encode as base64, the form used in appcasts and `signatures.json`.
    #[must_use]
    pub fn to_base64(&self) -> String {
        encoding::encode(self.0)
    }

    /// Decode from base64 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid base64 or not 64 bytes.
    pub fn from_base64(s: &str) -> CryptoResult<Self> {
        let bytes = encoding::decode(s)?;
        Self::try_from_slice(&bytes)
    }

    /// Verify this signature against a message and public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the public key is invalid or signature verification fails.
    #[cfg(feature = "native")]
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> CryptoResult<()> {
        use ed25519_dalek::Verifier;

        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(public_key.as_bytes())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        let sig = ed25519_dalek::Signature::from_bytes(&self.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_base64()[..12])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

#[cfg(feature = "native")]
impl From<ed25519_dalek::Signature> for Signature {
    fn from(sig: ed25519_dalek::Signature) -> Self {
        Self(sig.to_bytes())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_signature_length() {
        assert!(matches!(
            Signature::try_from_slice(&[0u8; 63]),
            Err(CryptoError::InvalidSignatureLength {
                expected: 64,
                actual: 63
            })
        ));
    }

    #[test]
    fn test_base64_form() {
        let sig = Signature::from_bytes([0u8; 64]);
        let text = sig.to_base64();
        assert_eq!(text.len(), 88);
        assert!(text.ends_with("=="));
        assert_eq!(Signature::from_base64(&text).unwrap(), sig);
        assert_eq!(sig.to_string(), text);
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_verify_binds_message_and_key() {
        use crate::KeyPair;

        let keypair = KeyPair::generate();
        let sig = keypair.sign(b"App-1.0.zip contents");

        assert!(sig.verify(b"App-1.0.zip contents", keypair.public()).is_ok());
        assert!(matches!(
            sig.verify(b"App-1.0.zip content", keypair.public()),
            Err(CryptoError::SignatureVerificationFailed)
        ));

        let other = KeyPair::generate();
        assert!(sig.verify(b"App-1.0.zip contents", other.public()).is_err());
    }
}
