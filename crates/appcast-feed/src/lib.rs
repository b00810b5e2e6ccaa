//! Appcast Feed - signature injection for Sparkle appcast feeds.
//!
//! This crate provides:
//! - [`SignatureMap`]: asset name → base64 signature, persisted as JSON
//! - [`FeedDocument`]: a lossless parse of an appcast into text and
//!   `<enclosure>` tags
//! - [`patch`] / [`patch_file`]: add `sparkle:edSignature` to matching
//!   enclosures without touching anything else
//!
//! # Example
//!
//! ```
//! use appcast_feed::{SignatureMap, patch};
//!
//! let mut signatures = SignatureMap::new();
//! signatures.insert("App-1.0.zip", "c2lnbmF0dXJl");
//!
//! let feed = r#"<enclosure url="https://example.com/App-1.0.zip" length="10" />"#;
//! let patched = patch(feed, &signatures);
//! assert_eq!(
//!     patched.text,
//!     r#"<enclosure url="https://example.com/App-1.0.zip" length="10" sparkle:edSignature="c2lnbmF0dXJl" />"#
//! );
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod document;
mod error;
mod fsutil;
mod patcher;
mod signature_map;

pub use document::{ENCLOSURE, EnclosureTag, FeedDocument};
pub use error::{FeedError, FeedResult};
pub use patcher::{ED_SIGNATURE_ATTR, FeedPatchOutcome, Patched, asset_name, patch, patch_file};
pub use signature_map::SignatureMap;
