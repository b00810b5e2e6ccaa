//! Configuration types for the appcast signing tools.
//!
//! Every section implements [`Default`] so that a missing file, a missing
//! section or a bare `[section]` header all produce a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignerConfig {
    /// Secret source and asset discovery.
    pub signing: SigningSection,
    /// Appcast documents to patch.
    pub feeds: FeedsSection,
    /// Output file names for key generation.
    pub keys: KeysSection,
    /// Log level and format.
    pub logging: LoggingSection,
}

/// `[signing]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SigningSection {
    /// Environment variable holding the base64 private key.
    pub secret_env: String,
    /// Directory holding the release assets.
    pub assets_dir: PathBuf,
    /// File extensions to sign, without the leading dot.
    pub extensions: Vec<String>,
    /// Signature map output. Relative paths resolve against the assets dir.
    pub signatures_file: PathBuf,
}

impl Default for SigningSection {
    fn default() -> Self {
        Self {
            secret_env: "SPARKLE_PRIVATE_KEY".to_owned(),
            assets_dir: PathBuf::from("dist"),
            extensions: vec!["zip".to_owned(), "dmg".to_owned()],
            signatures_file: PathBuf::from("signatures.json"),
        }
    }
}

impl SigningSection {
    /// Where the signature map goes for a run over `assets_dir`.
    #[must_use]
    pub fn signatures_path(&self, assets_dir: &Path) -> PathBuf {
        if self.signatures_file.is_absolute() {
            self.signatures_file.clone()
        } else {
            assets_dir.join(&self.signatures_file)
        }
    }
}

/// `[feeds]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedsSection {
    /// Feed documents. Missing files are skipped at run time.
    pub paths: Vec<PathBuf>,
}

impl Default for FeedsSection {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("docs/appcast.xml"),
                PathBuf::from("docs/appcast-beta.xml"),
            ],
        }
    }
}

/// `[keys]`
///
/// Plain file names, written inside the key generator's output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeysSection {
    /// Private key file (mode 0600).
    pub private_key_file: String,
    /// Public key file.
    pub public_key_file: String,
    /// Secret-store setup guide (mode 0600; it embeds the private key).
    pub guide_file: String,
    /// `Info.plist` snippet.
    pub snippet_file: String,
}

impl Default for KeysSection {
    fn default() -> Self {
        Self {
            private_key_file: "sparkle_private_key.txt".to_owned(),
            public_key_file: "sparkle_public_key.txt".to_owned(),
            guide_file: "github_secrets_setup.md".to_owned(),
            snippet_file: "sparkle_info_plist_snippet.xml".to_owned(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Minimum level: `trace`, `debug`, `info`, `warn` or `error`.
    pub level: String,
    /// Output format: `pretty`, `compact`, `json` or `full`.
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: "compact".to_owned(),
        }
    }
}
