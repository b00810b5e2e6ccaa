//! Key pair generation and the files handed to the operator.

use std::path::PathBuf;

use appcast_config::{KeysSection, SignerConfig};
use appcast_crypto::SignatureEngine;
use appcast_crypto::keyfile::{write_owner_only, write_world_readable};
use tracing::{debug, info};

use crate::error::{CliError, CliResult};
use crate::instructions::{plist_snippet, setup_guide};

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct KeygenRequest {
    /// Directory receiving the key files. Created if missing.
    pub output_dir: PathBuf,
    /// Replace an existing private key.
    pub force: bool,
    /// Output file names.
    pub files: KeysSection,
    /// Secret name the setup guide tells the operator to use.
    pub secret_env: String,
}

impl KeygenRequest {
    /// Build a request from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &SignerConfig, output_dir: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            force,
            files: config.keys.clone(),
            secret_env: config.signing.secret_env.clone(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Files written by [`generate_keys`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedKeys {
    /// Backend that produced the pair.
    pub backend: &'static str,
    /// Short hex identifier of the public key.
    pub key_id: String,
    /// Base64 public key.
    pub public_key: String,
    /// Private key file (mode 0600).
    pub private_key_file: PathBuf,
    /// Public key file.
    pub public_key_file: PathBuf,
    /// Setup guide (mode 0600).
    pub guide_file: PathBuf,
    /// `Info.plist` snippet file.
    pub snippet_file: PathBuf,
    /// The `Info.plist` snippet text.
    pub snippet: String,
}

/// Generate a key pair and write the key files, guide and snippet.
///
/// Nothing is written unless generation succeeds. An existing private key
/// is only replaced when `request.force` is set.
///
/// # Errors
///
/// Returns [`CliError::KeyFileExists`] when a private key is already
/// present, [`CliError::Crypto`] if the backend (and any fallback) fails, and
/// [`CliError::Io`] if a file cannot be written.
pub fn generate_keys(engine: &SignatureEngine, request: &KeygenRequest) -> CliResult<GeneratedKeys> {
    let private_key_file = request.path(&request.files.private_key_file);
    if !request.force && private_key_file.exists() {
        return Err(CliError::KeyFileExists {
            path: private_key_file,
        });
    }

    let (pair, backend) = engine.generate_keypair_reporting()?;
    let private_key = pair.secret().to_base64();
    let public_key = pair.public().to_base64();
    debug!(backend, "key pair generated");

    std::fs::create_dir_all(&request.output_dir).map_err(CliError::io(&request.output_dir))?;

    write_owner_only(&private_key_file, private_key.as_bytes(), request.force).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            CliError::KeyFileExists {
                path: private_key_file.clone(),
            }
        } else {
            CliError::io(&private_key_file)(e)
        }
    })?;

    let public_key_file = request.path(&request.files.public_key_file);
    write_world_readable(&public_key_file, public_key.as_bytes()).map_err(CliError::io(&public_key_file))?;

    let guide_file = request.path(&request.files.guide_file);
    let guide = setup_guide(&request.secret_env, &private_key);
    write_owner_only(&guide_file, guide.as_bytes(), true).map_err(CliError::io(&guide_file))?;

    let snippet = plist_snippet(&public_key);
    let snippet_file = request.path(&request.files.snippet_file);
    write_world_readable(&snippet_file, snippet.as_bytes()).map_err(CliError::io(&snippet_file))?;

    let key_id = pair.public().key_id_hex();
    info!(key_id = %key_id, dir = %request.output_dir.display(), "wrote key files");

    Ok(GeneratedKeys {
        backend,
        key_id,
        public_key,
        private_key_file,
        public_key_file,
        guide_file,
        snippet_file,
        snippet,
    })
}
