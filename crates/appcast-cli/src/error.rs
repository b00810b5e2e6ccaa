//! Error types for the signing flows.

use std::path::PathBuf;

use appcast_crypto::CryptoError;
use appcast_feed::FeedError;
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Key generation would replace an existing private key.
    #[error("{} already exists; pass --force to replace it", path.display())]
    KeyFileExists {
        /// The existing private key file.
        path: PathBuf,
    },

    /// The assets directory is missing or not a directory.
    #[error("assets directory {} does not exist", path.display())]
    AssetsDirMissing {
        /// The configured assets directory.
        path: PathBuf,
    },

    /// Key generation or key parsing failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The signature map could not be read or written.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// A file operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Result type for the signing flows.
pub type CliResult<T> = Result<T, CliError>;
