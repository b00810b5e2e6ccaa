//! Check a signature map against the assets it describes.

use std::path::Path;

use appcast_crypto::{PublicKey, Signature, SignatureEngine};
use appcast_feed::SignatureMap;
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Per-asset verification results. Each map entry lands in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    /// Assets whose signature checks out.
    pub verified: Vec<String>,
    /// Assets whose signature is malformed or does not match the contents.
    pub mismatched: Vec<String>,
    /// Entries whose asset file is absent.
    pub missing: Vec<String>,
}

impl VerifyReport {
    /// Whether every entry verified.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.mismatched.is_empty() && self.missing.is_empty()
    }
}

/// Parse a public key given either as a file path or as base64 text.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the file exists but cannot be read, or
/// [`CliError::Crypto`] if the key is not 32 base64-encoded bytes.
pub fn load_public_key(arg: &str) -> CliResult<PublicKey> {
    let path = Path::new(arg);
    let text = if path.is_file() {
        std::fs::read_to_string(path).map_err(CliError::io(path))?
    } else {
        arg.to_owned()
    };
    Ok(PublicKey::from_base64(text.trim())?)
}

/// Verify each entry of `signatures` against `<assets_dir>/<asset>`.
#[must_use]
pub fn verify_assets(public_key: &PublicKey, assets_dir: &Path, signatures: &SignatureMap) -> VerifyReport {
    let mut report = VerifyReport::default();

    for (asset, encoded) in signatures.iter() {
        let path = assets_dir.join(asset);
        let Ok(bytes) = std::fs::read(&path) else {
            warn!(asset, path = %path.display(), "asset missing");
            report.missing.push(asset.to_owned());
            continue;
        };

        let verified = Signature::from_base64(encoded)
            .and_then(|signature| SignatureEngine::verify(public_key, &bytes, &signature));
        match verified {
            Ok(()) => {
                debug!(asset, "signature verified");
                report.verified.push(asset.to_owned());
            },
            Err(e) => {
                warn!(asset, error = %e, "signature mismatch");
                report.mismatched.push(asset.to_owned());
            },
        }
    }

    report
}
