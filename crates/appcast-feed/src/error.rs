//! Feed error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while updating feeds or signature maps.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A feed document could not be read or rewritten. The file on disk is
    /// left as it was.
    #[error("feed update failed for {}: {reason}", path.display())]
    UpdateFailed {
        /// Feed document path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The signature map could not be read or written.
    #[error("signature map error for {}: {reason}", path.display())]
    SignatureMap {
        /// Signature map path.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
