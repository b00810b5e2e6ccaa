//! Prelude module - commonly used types for convenient import.
//!
//! Use `use appcast_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Engine and backends
pub use crate::{Purpose, SignatureEngine, SigningBackend, SparkleTools};

#[cfg(feature = "native")]
pub use crate::NativeBackend;

// Key material
pub use crate::{KeyPair, PublicKey, SecretKey, Signature};
