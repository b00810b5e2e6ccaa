//! Standard base64 encoding for keys and signatures.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CryptoError, CryptoResult};

/// Encode bytes as standard (padded) base64.
#[must_use]
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard base64 text.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidBase64Encoding`] if the text is not valid base64.
pub fn decode(text: &str) -> CryptoResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|_| CryptoError::InvalidBase64Encoding)
}
