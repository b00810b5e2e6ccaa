//! In-process Ed25519 backend.

use ed25519_dalek::{Signer, SigningKey};

use super::{NATIVE_BACKEND_NAME, SigningBackend};
use crate::error::CryptoResult;
use crate::keypair::{KEY_LENGTH, KeyPair, SecretKey};
use crate::signature::Signature;

/// Ed25519 via `ed25519-dalek`, keys drawn from the OS RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl SigningBackend for NativeBackend {
    fn name(&self) -> &'static str {
        NATIVE_BACKEND_NAME
    }

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        Ok(KeyPair::generate())
    }

    fn sign(&self, message: &[u8], key: &SecretKey) -> CryptoResult<Signature> {
        Ok(sign_with_seed(key.seed(), message))
    }
}

/// Deterministic RFC 8032 signature; the dalek key zeroizes itself on drop.
pub(crate) fn sign_with_seed(seed: &[u8; KEY_LENGTH], message: &[u8]) -> Signature {
    let signing_key = SigningKey::from_bytes(seed);
    Signature::from(signing_key.sign(message))
}
