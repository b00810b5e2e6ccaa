//! Sparkle's `generate_keys` / `sign_update` tools as a signing backend.
//!
//! Signing hands the private key to `sign_update` through a file. The key
//! file lives in a private scratch directory that exists only for the
//! duration of one signing call and is removed on every exit path when the
//! [`tempfile::TempDir`] guard drops.
//!
//! [`SigningBackend::sign_file`] passes the asset's own path to the tool.
//! Only [`SigningBackend::sign`] copies bytes into the scratch directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::{Purpose, SigningBackend};
use crate::error::{CryptoError, CryptoResult};
use crate::keyfile;
use crate::keypair::{KeyPair, PublicKey, SecretKey};
use crate::signature::Signature;

/// Sparkle's key generation tool.
pub const GENERATE_KEYS: &str = "generate_keys";

/// Sparkle's signing tool.
pub const SIGN_UPDATE: &str = "sign_update";

const EDSIGNATURE_ATTR: &str = "sparkle:edSignature=\"";

/// Locations of the Sparkle command-line tools.
#[derive(Debug, Clone, Default)]
pub struct SparkleTools {
    generate_keys: Option<PathBuf>,
    sign_update: Option<PathBuf>,
}

impl SparkleTools {
    /// Use explicit tool paths instead of searching `PATH`.
    #[must_use]
    pub fn at(generate_keys: Option<PathBuf>, sign_update: Option<PathBuf>) -> Self {
        Self {
            generate_keys,
            sign_update,
        }
    }

    /// Look up the tool needed for `purpose` on `PATH`.
    ///
    /// Returns `None` when it is not installed.
    #[must_use]
    pub fn locate(purpose: Purpose) -> Option<Self> {
        let tool = Self::tool_for(purpose);
        match which::which(tool) {
            Ok(path) => {
                debug!(tool, path = %path.display(), "found Sparkle tool");
                Some(match purpose {
                    Purpose::KeyGeneration => Self::at(Some(path), None),
                    Purpose::Signing => Self::at(None, Some(path)),
                })
            },
            Err(e) => {
                debug!(tool, error = %e, "Sparkle tool not found");
                None
            },
        }
    }

    /// The binary that serves `purpose`.
    #[must_use]
    pub const fn tool_for(purpose: Purpose) -> &'static str {
        match purpose {
            Purpose::KeyGeneration => GENERATE_KEYS,
            Purpose::Signing => SIGN_UPDATE,
        }
    }

    fn require<'a>(path: Option<&'a PathBuf>, tool: &str) -> CryptoResult<&'a Path> {
        path.map(PathBuf::as_path)
            .ok_or_else(|| CryptoError::BackendUnavailable {
                attempted: vec![format!("Sparkle `{tool}`")],
            })
    }
}

impl SigningBackend for SparkleTools {
    fn name(&self) -> &'static str {
        "Sparkle tools"
    }

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        let program = Self::require(self.generate_keys.as_ref(), GENERATE_KEYS)?;
        let stdout = run_tool(program, GENERATE_KEYS, &[])?;
        parse_generate_keys_output(&stdout)
    }

    fn sign(&self, message: &[u8], key: &SecretKey) -> CryptoResult<Signature> {
        let program = Self::require(self.sign_update.as_ref(), SIGN_UPDATE)?;
        let scratch = scratch_dir()?;
        let asset_path = scratch.path().join("asset");
        std::fs::write(&asset_path, message)?;
        sign_with_tool(program, scratch, &asset_path, key)
    }

    fn sign_file(&self, path: &Path, key: &SecretKey) -> CryptoResult<Signature> {
        let program = Self::require(self.sign_update.as_ref(), SIGN_UPDATE)?;
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            )
            .into());
        }
        sign_with_tool(program, scratch_dir()?, path, key)
    }
}

fn scratch_dir() -> CryptoResult<tempfile::TempDir> {
    // tempfile creates the directory with mode 0700.
    Ok(tempfile::Builder::new().prefix("appcast-sign-").tempdir()?)
}

fn sign_with_tool(
    program: &Path,
    scratch: tempfile::TempDir,
    asset: &Path,
    key: &SecretKey,
) -> CryptoResult<Signature> {
    let key_path = scratch.path().join("signing_key.pem");
    keyfile::write_owner_only(&key_path, key.to_base64().as_bytes(), false)?;

    let stdout = run_tool(program, SIGN_UPDATE, &[asset, key_path.as_path()])?;
    let signature = parse_sign_update_output(&stdout)?;

    if let Err(e) = scratch.close() {
        warn!(error = %e, "failed to remove signing scratch directory");
    }
    Ok(signature)
}

fn run_tool(program: &Path, tool: &str, args: &[&Path]) -> CryptoResult<String> {
    debug!(tool, program = %program.display(), "running Sparkle tool");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CryptoError::ToolFailed {
            tool: tool.to_string(),
            reason: format!("failed to run: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CryptoError::ToolFailed {
            tool: tool.to_string(),
            reason: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| CryptoError::ToolFailed {
        tool: tool.to_string(),
        reason: format!("output is not valid UTF-8: {e}"),
    })
}

fn parse_generate_keys_output(stdout: &str) -> CryptoResult<KeyPair> {
    let field = |label: &str| {
        stdout
            .lines()
            .find_map(|line| line.split_once(label).map(|(_, rest)| rest.trim()))
            .filter(|value| !value.is_empty())
    };

    let secret = field("Private key:").ok_or_else(|| {
        CryptoError::KeyGenerationFailed(format!("`{GENERATE_KEYS}` did not print a private key"))
    })?;
    let public = field("Public key:").ok_or_else(|| {
        CryptoError::KeyGenerationFailed(format!("`{GENERATE_KEYS}` did not print a public key"))
    })?;

    let secret = SecretKey::parse(secret)
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("private key: {e}")))?;
    let public = PublicKey::from_base64(public)
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("public key: {e}")))?;
    KeyPair::from_parts(secret, public)
}

/// Extract the signature from `sign_update` output.
///
/// Newer tools print `sparkle:edSignature="…" length="…"`; older ones print
/// the bare base64 signature.
///
/// # Errors
///
/// Returns [`CryptoError::ToolFailed`] if no 64-byte base64 signature is found.
pub fn parse_sign_update_output(stdout: &str) -> CryptoResult<Signature> {
    let candidate = match stdout.find(EDSIGNATURE_ATTR) {
        Some(start) => {
            let rest = &stdout[start.saturating_add(EDSIGNATURE_ATTR.len())..];
            rest.split('"').next().unwrap_or_default()
        },
        None => stdout.trim(),
    };

    Signature::from_base64(candidate).map_err(|e| CryptoError::ToolFailed {
        tool: SIGN_UPDATE.to_string(),
        reason: format!("unrecognised output ({e})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding;

    fn sample_signature() -> String {
        encoding::encode([7u8; 64])
    }

    #[test]
    fn test_parse_bare_signature() {
        let out = format!("{}\n", sample_signature());
        let sig = parse_sign_update_output(&out).unwrap();
        assert_eq!(sig.as_bytes(), &[7u8; 64]);
    }

    #[test]
    fn test_parse_attribute_form() {
        let out = format!("sparkle:edSignature=\"{}\" length=\"1024\"\n", sample_signature());
        let sig = parse_sign_update_output(&out).unwrap();
        assert_eq!(sig.to_base64(), sample_signature());
    }

    #[test]
    fn test_parse_garbage_is_tool_failure() {
        assert!(matches!(
            parse_sign_update_output("Error: no key\n"),
            Err(CryptoError::ToolFailed { ref tool, .. }) if tool == SIGN_UPDATE
        ));
        // Valid base64 but not a signature.
        assert!(parse_sign_update_output("YXBwY2FzdA==").is_err());
    }

    #[test]
    fn test_missing_tool_is_unavailable() {
        let tools = SparkleTools::default();
        let key = SecretKey::from_seed(&[1u8; 32]).unwrap();
        assert!(matches!(
            tools.sign(b"x", &key),
            Err(CryptoError::BackendUnavailable { .. })
        ));
        assert!(matches!(
            tools.generate_keypair(),
            Err(CryptoError::BackendUnavailable { .. })
        ));
    }

    #[test]
    fn test_parse_generate_keys_missing_private() {
        let out = format!("Public key: {}\n", encoding::encode([1u8; 32]));
        assert!(matches!(
            parse_generate_keys_output(&out),
            Err(CryptoError::KeyGenerationFailed(_))
        ));
    }

    #[cfg(feature = "native")]
    #[test]
    fn test_parse_generate_keys_output() {
        let pair = KeyPair::generate();
        let out = format!(
            "A key has been generated.\nPrivate key: {}\nPublic key: {}\n",
            pair.secret().to_base64().as_str(),
            pair.public().to_base64()
        );
        let parsed = parse_generate_keys_output(&out).unwrap();
        assert_eq!(parsed.public(), pair.public());
        assert_eq!(parsed.secret().seed(), pair.secret().seed());
    }

    #[cfg(unix)]
    mod scripted {
        use std::os::unix::fs::PermissionsExt;

        use super::*;

        /// Write an executable shell script standing in for `sign_update`.
        ///
        /// It records its arguments, and the key file's mode, to `log`.
        fn fake_sign_update(dir: &Path, log: &Path, body: &str) -> PathBuf {
            let path = dir.join("sign_update");
            let script = format!(
                "#!/bin/sh\necho \"$1\" > '{log}'\necho \"$2\" >> '{log}'\n\
                 stat -c %a \"$2\" >> '{log}' 2>/dev/null || stat -f %Lp \"$2\" >> '{log}'\n{body}\n",
                log = log.display()
            );
            std::fs::write(&path, script).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn logged_lines(log: &Path) -> Vec<String> {
            std::fs::read_to_string(log)
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }

        #[test]
        fn test_sign_removes_key_file_on_success() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.log");
            let body = format!("echo 'sparkle:edSignature=\"{}\" length=\"3\"'", sample_signature());
            let tools = SparkleTools::at(None, Some(fake_sign_update(dir.path(), &log, &body)));

            let key = SecretKey::from_seed(&[2u8; 32]).unwrap();
            let sig = tools.sign(b"abc", &key).unwrap();
            assert_eq!(sig.to_base64(), sample_signature());

            let lines = logged_lines(&log);
            let key_path = PathBuf::from(&lines[1]);
            assert_eq!(lines[2], "600");
            assert!(!key_path.exists(), "key file must be removed after signing");
            assert!(!key_path.parent().unwrap().exists());
        }

        #[test]
        fn test_sign_file_passes_asset_path_through() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.log");
            let asset = dir.path().join("App-1.0.dmg");
            std::fs::write(&asset, b"disk image").unwrap();
            let body = format!("echo '{}'", sample_signature());
            let tools = SparkleTools::at(None, Some(fake_sign_update(dir.path(), &log, &body)));

            let key = SecretKey::from_seed(&[2u8; 32]).unwrap();
            let sig = tools.sign_file(&asset, &key).unwrap();
            assert_eq!(sig.to_base64(), sample_signature());

            let lines = logged_lines(&log);
            assert_eq!(PathBuf::from(&lines[0]), asset);
            assert!(!PathBuf::from(&lines[1]).exists());

            let missing = tools.sign_file(&dir.path().join("gone.zip"), &key).unwrap_err();
            assert!(matches!(missing, CryptoError::IoError(_)), "got: {missing}");
        }

        #[test]
        fn test_sign_removes_key_file_on_failure() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("args.log");
            let tools = SparkleTools::at(
                None,
                Some(fake_sign_update(dir.path(), &log, "echo boom >&2; exit 3")),
            );

            let key = SecretKey::from_seed(&[2u8; 32]).unwrap();
            let err = tools.sign(b"abc", &key).unwrap_err();
            assert!(err.to_string().contains("boom"), "got: {err}");

            let key_path = PathBuf::from(&logged_lines(&log)[1]);
            assert!(!key_path.exists(), "key file must be removed after a failed call");
        }
    }
}
