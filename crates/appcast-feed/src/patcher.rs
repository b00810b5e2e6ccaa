//! Signature injection into appcast enclosures.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::{debug, info};
use url::Url;

use crate::document::FeedDocument;
use crate::error::{FeedError, FeedResult};
use crate::fsutil::atomic_write;
use crate::signature_map::SignatureMap;

/// Attribute that carries an enclosure's Ed25519 signature.
pub const ED_SIGNATURE_ATTR: &str = "sparkle:edSignature";

/// Result of patching a document in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    /// The rendered document.
    pub text: String,
    /// Asset names whose enclosures gained a signature, in document order.
    pub signed: Vec<String>,
}

impl Patched {
    /// Whether any enclosure changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.signed.is_empty()
    }
}

/// Outcome of patching a feed file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPatchOutcome {
    /// The feed document.
    pub path: PathBuf,
    /// Asset names whose enclosures gained a signature.
    pub signed: Vec<String>,
}

/// Attach signatures to the enclosures of `document`.
///
/// An enclosure is signed when the file name of its `url` is a key of
/// `signatures` and it has no [`ED_SIGNATURE_ATTR`] yet. The new attribute
/// goes after the last existing one; nothing else in the document changes.
/// Applying the same map twice is a no-op the second time.
#[must_use]
pub fn patch(document: &str, signatures: &SignatureMap) -> Patched {
    let mut doc = FeedDocument::parse(document);
    let mut signed = Vec::new();

    for tag in doc.enclosures_mut() {
        if tag.has_attribute(ED_SIGNATURE_ATTR) {
            continue;
        }
        let Some(asset) = tag.attribute("url").as_deref().and_then(asset_name) else {
            continue;
        };
        if let Some(signature) = signatures.get(&asset) {
            tag.push_attribute(ED_SIGNATURE_ATTR, signature);
            signed.push(asset);
        }
    }

    if signed.is_empty() {
        // Nothing to re-render; hand back the input untouched.
        return Patched {
            text: document.to_string(),
            signed,
        };
    }
    Patched {
        text: doc.render(),
        signed,
    }
}

/// Patch the feed at `path` in place.
///
/// The file is only rewritten when an enclosure changed, and then through a
/// temp file and rename so a failure never leaves a half-written feed.
///
/// # Errors
///
/// Returns [`FeedError::UpdateFailed`] if the file cannot be read (or is
/// not UTF-8) or the replacement cannot be written.
pub fn patch_file(path: &Path, signatures: &SignatureMap) -> FeedResult<FeedPatchOutcome> {
    let update_failed = |reason: String| FeedError::UpdateFailed {
        path: path.to_path_buf(),
        reason,
    };

    let original = std::fs::read_to_string(path).map_err(|e| update_failed(e.to_string()))?;
    let patched = patch(&original, signatures);

    if patched.changed() {
        atomic_write(path, patched.text.as_bytes()).map_err(|e| update_failed(e.to_string()))?;
        info!(path = %path.display(), signed = patched.signed.len(), "updated feed with signatures");
    } else {
        debug!(path = %path.display(), "feed already up to date");
    }

    Ok(FeedPatchOutcome {
        path: path.to_path_buf(),
        signed: patched.signed,
    })
}

/// The file name an enclosure URL points at.
///
/// Takes the last path segment, ignoring any query or fragment, and
/// percent-decodes it. Relative URLs are accepted. Returns `None` when the
/// URL ends in `/` or has no path.
#[must_use]
pub fn asset_name(url: &str) -> Option<String> {
    let url = url.trim();
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed.path_segments()?.next_back()?.to_string(),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            path.rsplit('/').next().unwrap_or_default().to_string()
        },
    };

    if segment.is_empty() {
        return None;
    }
    Some(percent_decode(&segment))
}

fn percent_decode(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map_or_else(|_| segment.to_string(), Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use appcast_test::fixtures;

    use super::*;

    fn sigs(pairs: &[(&str, &str)]) -> SignatureMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_asset_name_variants() {
        assert_eq!(asset_name("https://example.com/dl/App-1.0.zip").as_deref(), Some("App-1.0.zip"));
        assert_eq!(
            asset_name("https://example.com/App-1.0.zip?token=abc#frag").as_deref(),
            Some("App-1.0.zip")
        );
        assert_eq!(asset_name("https://example.com/My%20App.dmg").as_deref(), Some("My App.dmg"));
        assert_eq!(asset_name("releases/App-1.0.dmg").as_deref(), Some("App-1.0.dmg"));
        assert_eq!(asset_name("App-1.0.dmg?x=1").as_deref(), Some("App-1.0.dmg"));
        assert_eq!(asset_name("https://example.com/dir/"), None);
        assert_eq!(asset_name("https://example.com"), None);
        assert_eq!(asset_name("mailto:someone@example.com"), None);
    }

    #[test]
    fn test_percent_decode_edge_cases() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%2"), "a%2");
        assert_eq!(percent_decode("a%zz"), "a%zz");
        assert_eq!(percent_decode("%C3%BC.zip"), "ü.zip");
        // Invalid UTF-8 after decoding keeps the raw segment.
        assert_eq!(percent_decode("%FF.zip"), "%FF.zip");
    }

    #[test]
    fn test_patch_signs_matching_entries() {
        let map = sigs(&[("App-1.0.zip", "U0lHWklQ"), ("App-1.0.dmg", "U0lHRE1H")]);
        let patched = patch(fixtures::SAMPLE_APPCAST, &map);

        assert_eq!(patched.signed, ["App-1.0.zip", "App-1.0.dmg"]);
        assert_eq!(patched.text.matches("sparkle:edSignature=\"U0lHWklQ\"").count(), 1);
        assert_eq!(patched.text.matches("sparkle:edSignature=\"U0lHRE1H\"").count(), 1);
        assert!(patched.text.contains(
            r#"<enclosure url="https://example.com/releases/App-1.0.zip" length="1024" type="application/octet-stream" sparkle:edSignature="U0lHWklQ" />"#
        ));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let map = sigs(&[("App-1.0.zip", "U0lHWklQ"), ("App-1.0.dmg", "U0lHRE1H")]);
        let once = patch(fixtures::SAMPLE_APPCAST, &map);
        let twice = patch(&once.text, &map);

        assert_eq!(twice.text, once.text);
        assert!(!twice.changed());
    }

    #[test]
    fn test_patch_leaves_unknown_and_signed_entries() {
        let map = sigs(&[("App-0.9.zip", "TkVX")]);
        let patched = patch(fixtures::SAMPLE_APPCAST, &map);

        // App-0.9.zip already carries a signature in the fixture.
        assert!(!patched.changed());
        assert_eq!(patched.text, fixtures::SAMPLE_APPCAST);
        assert!(!patched.text.contains("TkVX"));
    }

    #[test]
    fn test_patch_matches_exact_file_name() {
        let doc = r#"<enclosure url="https://example.com/App-beta.zip" />
<enclosure url="https://example.com/App.zip" />"#;
        let patched = patch(doc, &sigs(&[("App.zip", "QQ==")]));

        assert_eq!(patched.signed, ["App.zip"]);
        assert_eq!(
            patched.text,
            r#"<enclosure url="https://example.com/App-beta.zip" />
<enclosure url="https://example.com/App.zip" sparkle:edSignature="QQ==" />"#
        );
    }

    #[test]
    fn test_patch_empty_map_is_identity() {
        let patched = patch(fixtures::SAMPLE_APPCAST, &SignatureMap::new());
        assert_eq!(patched.text, fixtures::SAMPLE_APPCAST);
        assert!(patched.signed.is_empty());
    }

    #[test]
    fn test_patch_file_writes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appcast.xml");
        std::fs::write(&path, fixtures::SAMPLE_APPCAST).unwrap();

        let outcome = patch_file(&path, &SignatureMap::new()).unwrap();
        assert!(outcome.signed.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), fixtures::SAMPLE_APPCAST);

        let map = sigs(&[("App-1.0.dmg", "RE1H")]);
        let outcome = patch_file(&path, &map).unwrap();
        assert_eq!(outcome.signed, ["App-1.0.dmg"]);
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, patch(fixtures::SAMPLE_APPCAST, &map).text);
    }

    #[test]
    fn test_patch_file_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xml");
        let err = patch_file(&path, &SignatureMap::new()).unwrap_err();
        assert!(matches!(err, FeedError::UpdateFailed { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_patch_file_unwritable_directory_leaves_document() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let feeds = dir.path().join("docs");
        std::fs::create_dir(&feeds).unwrap();
        let path = feeds.join("appcast.xml");
        std::fs::write(&path, fixtures::SAMPLE_APPCAST).unwrap();
        std::fs::set_permissions(&feeds, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions; nothing to observe then.
        let probe = feeds.join(".probe");
        let writable = std::fs::write(&probe, b"").is_ok();
        if !writable {
            let err = patch_file(&path, &sigs(&[("App-1.0.zip", "QQ==")])).unwrap_err();
            assert!(matches!(err, FeedError::UpdateFailed { .. }));
            assert_eq!(std::fs::read_to_string(&path).unwrap(), fixtures::SAMPLE_APPCAST);
        }

        std::fs::set_permissions(&feeds, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}
