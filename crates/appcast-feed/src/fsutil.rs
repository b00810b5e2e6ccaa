//! Atomic file replacement.

use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` via a sibling temp file and a rename.
///
/// Readers see either the old or the new content, never a partial write.
/// An existing file's permission bits are carried over.
pub(crate) fn atomic_write(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(contents)?;
    staged.as_file().sync_all()?;

    if let Ok(meta) = std::fs::metadata(path) {
        staged.as_file().set_permissions(meta.permissions())?;
    }

    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
