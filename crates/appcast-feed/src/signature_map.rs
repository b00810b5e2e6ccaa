//! Asset name → signature map, persisted as `signatures.json`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::fsutil::atomic_write;

/// Signatures for one signing run, keyed by asset file name.
///
/// Serializes as a flat JSON object: `{ "App-1.0.zip": "<base64>" }`.
/// Keys are kept sorted so the persisted file is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureMap(BTreeMap<String, String>);

impl SignatureMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the signature for `asset`, returning the previous one if any.
    pub fn insert(
        &mut self,
        asset: impl Into<String>,
        signature: impl Into<String>,
    ) -> Option<String> {
        self.0.insert(asset.into(), signature.into())
    }

    /// Look up the signature for an asset file name.
    #[must_use]
    pub fn get(&self, asset: &str) -> Option<&str> {
        self.0.get(asset).map(String::as_str)
    }

    /// Number of signed assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was signed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(asset, signature)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write the map as pretty-printed JSON, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SignatureMap`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> FeedResult<()> {
        let map_err = |reason: String| FeedError::SignatureMap {
            path: path.to_path_buf(),
            reason,
        };

        let mut json = serde_json::to_string_pretty(self).map_err(|e| map_err(e.to_string()))?;
        json.push('\n');
        atomic_write(path, json.as_bytes()).map_err(|e| map_err(e.to_string()))
    }

    /// Load a map previously written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SignatureMap`] if the file is missing or malformed.
    pub fn load(path: &Path) -> FeedResult<Self> {
        let map_err = |reason: String| FeedError::SignatureMap {
            path: path.to_path_buf(),
            reason,
        };

        let data = std::fs::read_to_string(path).map_err(|e| map_err(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| map_err(e.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignatureMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = SignatureMap::new();
        assert!(map.is_empty());

        assert!(map.insert("App-1.0.zip", "c2lnMQ==").is_none());
        assert_eq!(map.insert("App-1.0.zip", "c2lnMg=="), Some("c2lnMQ==".into()));
        assert_eq!(map.get("App-1.0.zip"), Some("c2lnMg=="));
        assert_eq!(map.get("App-1.0.dmg"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let map: SignatureMap = [("b.dmg", "Yg=="), ("a.zip", "YQ==")].into_iter().collect();
        let json = serde_json::to_string_pretty(&map).unwrap();
        assert_eq!(json, "{\n  \"a.zip\": \"YQ==\",\n  \"b.dmg\": \"Yg==\"\n}");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");

        let map: SignatureMap = [("App-1.0.zip", "YQ==")].into_iter().collect();
        map.save(&path).unwrap();
        assert_eq!(SignatureMap::load(&path).unwrap(), map);

        // Overwritten, not merged.
        SignatureMap::new().save(&path).unwrap();
        assert!(SignatureMap::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SignatureMap::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, FeedError::SignatureMap { .. }));
    }

    #[test]
    fn test_load_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signatures.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(SignatureMap::load(&path).is_err());
    }
}
