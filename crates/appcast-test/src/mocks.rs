//! Mock signing backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use appcast_crypto::prelude::*;

/// A backend whose every operation fails with the same reason.
#[derive(Debug)]
pub struct FailingBackend {
    reason: String,
}

impl FailingBackend {
    /// Create a backend that fails with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SigningBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing mock"
    }

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        Err(CryptoError::KeyGenerationFailed(self.reason.clone()))
    }

    fn sign(&self, _message: &[u8], _key: &SecretKey) -> CryptoResult<Signature> {
        Err(CryptoError::ToolFailed {
            tool: "mock".to_string(),
            reason: self.reason.clone(),
        })
    }
}

/// A native backend that refuses to sign selected messages.
///
/// Messages containing any registered marker fail; everything else is
/// signed for real. Every `sign` call is counted, and the count stays
/// readable through [`ScriptedBackend::sign_calls`] after the backend is
/// boxed into an engine.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    poisoned: Mutex<Vec<Vec<u8>>>,
    sign_calls: Arc<AtomicUsize>,
}

/// Shared handle on a [`ScriptedBackend`]'s `sign` call count.
#[derive(Debug, Clone)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Calls recorded so far.
    #[must_use]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ScriptedBackend {
    /// Create a backend that signs everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail to sign any message containing `marker`.
    #[must_use]
    pub fn failing_on(self, marker: impl AsRef<[u8]>) -> Self {
        if let Ok(mut guard) = self.poisoned.lock() {
            guard.push(marker.as_ref().to_vec());
        }
        self
    }

    /// Handle on the number of `sign` calls.
    #[must_use]
    pub fn sign_calls(&self) -> CallCounter {
        CallCounter(Arc::clone(&self.sign_calls))
    }

    fn is_poisoned(&self, message: &[u8]) -> bool {
        self.poisoned.lock().is_ok_and(|markers| {
            markers
                .iter()
                .any(|marker| !marker.is_empty() && message.windows(marker.len()).any(|w| w == marker.as_slice()))
        })
    }
}

impl SigningBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted mock"
    }

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        NativeBackend.generate_keypair()
    }

    fn sign(&self, message: &[u8], key: &SecretKey) -> CryptoResult<Signature> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.is_poisoned(message) {
            return Err(CryptoError::ToolFailed {
                tool: "mock".to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        NativeBackend.sign(message, key)
    }
}
