//! Test fixtures: keys, assets and appcast documents.

use std::path::{Path, PathBuf};

use appcast_crypto::{KeyPair, SecretKey};

/// Seed of [`test_keypair`].
pub const TEST_SEED: [u8; 32] = [7; 32];

/// A release feed with a zip and a dmg for 1.0 and an already signed 0.9.
pub const SAMPLE_APPCAST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle">
  <channel>
    <title>App Changelog</title>
    <!-- newest first -->
    <item>
      <title>Version 1.0</title>
      <sparkle:version>100</sparkle:version>
      <enclosure url="https://example.com/releases/App-1.0.zip" length="1024" type="application/octet-stream" />
      <enclosure
          url="https://example.com/releases/App-1.0.dmg"
          length="2048"
          type="application/x-apple-diskimage"/>
    </item>
    <item>
      <title>Version 0.9</title>
      <enclosure url="https://example.com/releases/App-0.9.zip" length="512" sparkle:edSignature="T0xE" />
    </item>
  </channel>
</rss>
"#;

/// A beta feed that only lists the zip.
pub const BETA_APPCAST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle">
  <channel>
    <title>App Beta</title>
    <item>
      <title>Version 1.0</title>
      <enclosure url="https://example.com/releases/App-1.0.zip" length="1024" type="application/octet-stream" />
    </item>
  </channel>
</rss>
"#;

/// A deterministic key pair.
///
/// # Panics
///
/// Never in practice; the seed is a valid key.
#[must_use]
pub fn test_keypair() -> KeyPair {
    let secret = SecretKey::from_seed(&TEST_SEED).unwrap();
    let public = secret.public_key();
    KeyPair::from_parts(secret, public).unwrap()
}

/// Write `contents` to `dir/name`, returning the path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_asset(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Lay out `dist/` with two assets and `docs/` with both feeds under `root`.
///
/// Returns `(assets_dir, [release_feed, beta_feed])`.
///
/// # Panics
///
/// Panics if the layout cannot be written.
pub fn release_layout(root: &Path) -> (PathBuf, [PathBuf; 2]) {
    let dist = root.join("dist");
    let docs = root.join("docs");
    std::fs::create_dir_all(&dist).unwrap();
    std::fs::create_dir_all(&docs).unwrap();
    write_asset(&dist, "App-1.0.zip", b"zip archive bytes");
    write_asset(&dist, "App-1.0.dmg", b"disk image bytes");

    let release = write_asset(&docs, "appcast.xml", SAMPLE_APPCAST.as_bytes());
    let beta = write_asset(&docs, "appcast-beta.xml", BETA_APPCAST.as_bytes());
    (dist, [release, beta])
}
