//! Appcast Crypto - Ed25519 signing engine for release artifacts.
//!
//! This crate provides:
//! - Ed25519 key pairs with zeroized secret material
//! - Parsing of Sparkle-style private keys (base64, PEM-wrapped, legacy 64-byte)
//! - A [`SignatureEngine`] over two interchangeable backends: the Sparkle
//!   command-line tools, or the in-process `ed25519-dalek` implementation
//! - Base64 helpers and owner-only key file writing
//!
//! # Example
//!
//! ```no_run
//! use appcast_crypto::prelude::*;
//!
//! let engine = SignatureEngine::select(Purpose::KeyGeneration).unwrap();
//! let pair = engine.generate_keypair().unwrap();
//! println!("public key: {}", pair.public());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod backend;
pub mod encoding;
pub mod keyfile;
pub mod prelude;

mod engine;
mod error;
mod keypair;
mod signature;

#[cfg(feature = "native")]
pub use backend::NativeBackend;
pub use backend::{Purpose, SigningBackend, SparkleTools};
pub use engine::SignatureEngine;
pub use error::{CryptoError, CryptoResult};
pub use keypair::{KEY_LENGTH, KeyPair, PublicKey, SecretKey};
pub use signature::{SIGNATURE_LENGTH, Signature};
