//! Batch signing of release assets and the feeds that list them.

use std::path::{Path, PathBuf};

use appcast_config::{SecretString, SignerConfig};
use appcast_crypto::{CryptoError, CryptoResult, Purpose, SecretKey, SignatureEngine};
use appcast_feed::{FeedError, FeedPatchOutcome, SignatureMap, patch_file};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

/// One signing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignRequest {
    /// Directory holding the assets. Not searched recursively.
    pub assets_dir: PathBuf,
    /// Extensions to sign, without the dot.
    pub extensions: Vec<String>,
    /// Where the signature map is written.
    pub signatures_file: PathBuf,
    /// Feed documents to patch. Missing ones are skipped.
    pub feeds: Vec<PathBuf>,
}

impl SignRequest {
    /// Build a request from configuration, with command-line overrides.
    ///
    /// An empty `feeds` list keeps the configured feeds.
    #[must_use]
    pub fn from_config(config: &SignerConfig, assets_dir: Option<PathBuf>, feeds: Vec<PathBuf>) -> Self {
        let assets_dir = assets_dir.unwrap_or_else(|| config.signing.assets_dir.clone());
        let feeds = if feeds.is_empty() {
            config.feeds.paths.clone()
        } else {
            feeds
        };
        Self {
            signatures_file: config.signing.signatures_path(&assets_dir),
            extensions: config.signing.extensions.clone(),
            assets_dir,
            feeds,
        }
    }
}

/// An asset that could not be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    /// File name of the asset.
    pub asset: String,
    /// `SigningFailed` or `BackendUnavailable`.
    pub error: CryptoError,
}

/// What happened to one feed document.
#[derive(Debug)]
pub enum FeedStatus {
    /// The feed was read and, if anything matched, rewritten.
    Patched(FeedPatchOutcome),
    /// The feed does not exist.
    Missing(PathBuf),
    /// The feed could not be updated; it is unchanged on disk.
    Failed(FeedError),
}

/// Result of a completed signing run.
#[derive(Debug)]
pub struct SigningReport {
    /// Backend used, if one could be selected.
    pub backend: Option<&'static str>,
    /// Signatures of the assets that were signed.
    pub signatures: SignatureMap,
    /// Where the map was written.
    pub signatures_file: PathBuf,
    /// Assets that could not be signed.
    pub failures: Vec<AssetFailure>,
    /// Per-feed results, in request order.
    pub feeds: Vec<FeedStatus>,
}

/// Outcome of [`sign_assets`].
#[derive(Debug)]
pub enum SignOutcome {
    /// No secret was provided; nothing was read or written.
    Skipped,
    /// The batch ran.
    Completed(SigningReport),
}

/// Sign every matching asset, save the signature map and patch the feeds.
///
/// The backend is probed once, after the assets directory is known to exist.
///
/// # Errors
///
/// See [`sign_assets_with`].
pub fn sign_assets(request: &SignRequest, secret: Option<&SecretString>) -> CliResult<SignOutcome> {
    sign_assets_with(request, secret, || SignatureEngine::select(Purpose::Signing))
}

/// [`sign_assets`] with an explicit backend selection.
///
/// Per-asset failures and feed failures are collected in the report.
///
/// # Errors
///
/// Returns [`CliError::AssetsDirMissing`] if the assets directory does not
/// exist, [`CliError::Io`] if it cannot be listed, and [`CliError::Feed`]
/// if the signature map cannot be written.
pub fn sign_assets_with(
    request: &SignRequest,
    secret: Option<&SecretString>,
    select: impl FnOnce() -> CryptoResult<SignatureEngine>,
) -> CliResult<SignOutcome> {
    let Some(secret) = secret.filter(|s| !s.expose().trim().is_empty()) else {
        warn!("no signing key provided; skipping signature generation");
        return Ok(SignOutcome::Skipped);
    };

    if !request.assets_dir.is_dir() {
        return Err(CliError::AssetsDirMissing {
            path: request.assets_dir.clone(),
        });
    }

    let assets = discover_assets(request).map_err(CliError::io(&request.assets_dir))?;
    info!(count = assets.len(), dir = %request.assets_dir.display(), "signing assets");

    let signer = select().and_then(|engine| {
        let key = SecretKey::parse(secret.expose()).map_err(CryptoError::into_signing_failure)?;
        Ok((engine, key))
    });
    match &signer {
        Ok((engine, _)) => debug!(backend = engine.backend_name(), "signing backend selected"),
        Err(e) => warn!(error = %e, "no usable signer; every asset will fail"),
    }

    let mut signatures = SignatureMap::new();
    let mut failures = Vec::new();

    for (name, path) in assets {
        let result = match &signer {
            Ok((engine, key)) => engine.sign_file(&path, key),
            Err(e) => Err(e.clone()),
        };
        match result {
            Ok(signature) => {
                info!(asset = %name, "signed");
                signatures.insert(name, signature.to_base64());
            },
            Err(error) => {
                warn!(asset = %name, error = %error, "could not sign asset");
                failures.push(AssetFailure { asset: name, error });
            },
        }
    }

    signatures.save(&request.signatures_file)?;
    info!(path = %request.signatures_file.display(), count = signatures.len(), "saved signatures");

    let feeds = request
        .feeds
        .iter()
        .map(|path| patch_feed(path, &signatures))
        .collect();

    Ok(SignOutcome::Completed(SigningReport {
        backend: signer.as_ref().ok().map(|(engine, _)| engine.backend_name()),
        signatures,
        signatures_file: request.signatures_file.clone(),
        failures,
        feeds,
    }))
}

fn patch_feed(path: &Path, signatures: &SignatureMap) -> FeedStatus {
    if !path.exists() {
        debug!(path = %path.display(), "feed not found, skipping");
        return FeedStatus::Missing(path.to_path_buf());
    }
    match patch_file(path, signatures) {
        Ok(outcome) => FeedStatus::Patched(outcome),
        Err(e) => {
            warn!(error = %e, "feed left unchanged");
            FeedStatus::Failed(e)
        },
    }
}

/// Regular files in the assets directory with a configured extension,
/// sorted by name. The signature map itself is never listed.
fn discover_assets(request: &SignRequest) -> std::io::Result<Vec<(String, PathBuf)>> {
    let suffixes: Vec<String> = request.extensions.iter().map(|ext| format!(".{ext}")).collect();
    let mut assets = Vec::new();

    for entry in std::fs::read_dir(&request.assets_dir)? {
        let path = entry?.path();
        if !path.is_file() || path == request.signatures_file {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping asset with a non UTF-8 name");
            continue;
        };
        if suffixes.iter().any(|suffix| name.len() > suffix.len() && name.ends_with(suffix.as_str())) {
            assets.push((name.to_owned(), path.clone()));
        }
    }

    assets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(assets)
}
